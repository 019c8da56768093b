//! Replays a recorded flight through the preprocessing and the altitude estimator.
//!
//! Run with `cargo run --example flight_replay --features std`.

use std::error::Error;

use altitude_kalman::preprocessing::{heights_above_ground, vertical_acceleration, SensorAggregator};
use altitude_kalman::{
    AltitudeEstimator, FilterConfig, FilterInput, FlightPhase, SensorFaultVector,
};
use csv::ReaderBuilder;
use serde::Deserialize;

const DATASET: &str = "tests/data/synthetic-flight.csv";
const SAMPLING_PERIOD: f32 = 0.01;
const GROUND_TEMPERATURE: f32 = 25.0;

/// One row of the flight log: two IMUs, one high-g accelerometer and three barometers.
#[derive(Debug, Deserialize)]
struct FlightLogRecord {
    /// The sample time, in seconds since power-up.
    time: f32,
    phase: String,
    /// Vertical axis of the first IMU, in m/s².
    imu0: f32,
    imu1: f32,
    high_g: f32,
    /// Barometer pressures, in Pa.
    pressure0: f32,
    pressure1: f32,
    pressure2: f32,
    #[serde(rename = "imu_faulty")]
    imus_faulty: u8,
    baro1_faulty: u8,
}

type Faults = SensorFaultVector<2, 1, 3, 0>;

impl FlightLogRecord {
    fn flight_phase(&self) -> FlightPhase {
        match self.phase.as_str() {
            "READY" => FlightPhase::Ready,
            "THRUSTING" => FlightPhase::Thrusting,
            "COASTING" => FlightPhase::Coasting,
            "DROGUE" => FlightPhase::Drogue,
            "MAIN" => FlightPhase::Main,
            "TOUCHDOWN" => FlightPhase::Touchdown,
            _ => FlightPhase::Moving,
        }
    }

    fn faults(&self) -> Faults {
        let mut faults = Faults::healthy();
        if self.imus_faulty != 0 {
            faults = faults.with_faulty_imu(0).with_faulty_imu(1);
        }
        if self.baro1_faulty != 0 {
            faults = faults.with_faulty_barometer(1);
        }
        faults
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(DATASET)?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<FlightLogRecord>, _>>()?;

    let config = FilterConfig::<f32>::triple_barometer();
    let mut estimator = AltitudeEstimator::<f32, 3>::new(SAMPLING_PERIOD, &config);
    let mut aggregator = SensorAggregator::<f32>::default();

    let mut reference_pressure = None;
    let mut apogee = (0.0_f32, 0.0_f32);
    let mut failed_ticks = 0;
    let mut skipped_ticks = 0;

    for record in &records {
        let faults = record.faults();
        let pressures = [record.pressure0, record.pressure1, record.pressure2];
        let sample = aggregator.aggregate(
            &[record.imu0, record.imu1],
            &[record.high_g],
            &pressures,
            &faults,
        );

        // Calibrate the ground level on the first sample with a healthy barometer.
        if reference_pressure.is_none() && !sample.pressure_lost {
            reference_pressure = Some(sample.pressure);
        }
        let Some(reference_pressure) = reference_pressure else {
            skipped_ticks += 1;
            continue;
        };
        let heights = heights_above_ground(reference_pressure, &pressures, GROUND_TEMPERATURE);

        let input = FilterInput::new(
            vertical_acceleration(sample.acceleration, 1.0),
            heights,
            record.flight_phase(),
        )
        .with_faults(faults);

        match estimator.step(&input) {
            Ok(estimate) if estimate.altitude > apogee.1 => {
                apogee = (record.time, estimate.altitude);
            }
            Ok(_) => {}
            Err(e) => {
                failed_ticks += 1;
                eprintln!("t = {:.2} s: {e}", record.time);
            }
        }
    }

    let estimate = estimator.estimate();
    println!("Replayed {} samples from {DATASET}", records.len());
    println!("Apogee: {:.1} m at t = {:.2} s", apogee.1, apogee.0);
    println!(
        "Final estimate: altitude {:.1} m, velocity {:.1} m/s",
        estimate.altitude, estimate.velocity
    );
    println!("Ticks with filter errors: {failed_ticks}");
    println!("Ticks skipped before ground calibration: {skipped_ticks}");
    Ok(())
}
