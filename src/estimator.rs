//! The per-tick entry point of the altitude filter.

use crate::config::{FilterConfig, HeightLossPolicy};
use crate::error::FilterError;
use crate::kalman::FilterState;
use crate::noise_schedule::{reset_on_transition, NoiseSchedule, ResetKind};
use crate::num_traits::FilterScalar;
use crate::types::{FilterInput, FlightPhase, StateEstimate};

/// An altitude estimator fusing averaged acceleration and `BARO` barometers.
///
/// Each call to [`step`](Self::step) decides from the sensor faults which prediction and
/// update to run and sequences them.
#[derive(Debug, Clone)]
pub struct AltitudeEstimator<T, const BARO: usize> {
    filter: FilterState<T, BARO>,
    noise_schedule: Option<NoiseSchedule<T>>,
    tolerated_barometer_faults: usize,
    height_loss: HeightLossPolicy,
    /// The flight phase of the previous tick.
    phase: Option<FlightPhase>,
}

impl<T, const BARO: usize> AltitudeEstimator<T, BARO>
where
    T: FilterScalar,
{
    /// Initializes a new instance of the [`AltitudeEstimator`] struct.
    ///
    /// ## Arguments
    /// * `sampling_period` - The fixed time between two ticks, in seconds.
    /// * `config` - The filter tuning.
    pub fn new(sampling_period: T, config: &FilterConfig<T>) -> Self {
        Self {
            filter: FilterState::new(sampling_period, config),
            noise_schedule: config.noise_schedule,
            tolerated_barometer_faults: config.tolerated_barometer_faults,
            height_loss: config.height_loss,
            phase: None,
        }
    }

    /// Runs one filter tick and returns the corrected state.
    ///
    /// On error the corrected state is left at a well-defined value (see [`FilterError`]) and
    /// the next tick proceeds normally.
    pub fn step<const IMU: usize, const ACC: usize, const MAG: usize>(
        &mut self,
        input: &FilterInput<T, IMU, ACC, BARO, MAG>,
    ) -> Result<StateEstimate<T>, FilterError> {
        self.apply_phase(input.phase);

        if input.faults.all_acceleration_faulty() {
            log::warn!("All acceleration sensors are faulty, freezing prediction");
            self.filter.freeze_prediction();
        } else {
            self.filter.predict(input.acceleration);
        }

        self.correct(&input.faults.active_barometers(), &input.heights)?;
        Ok(self.filter.estimate())
    }

    /// Handles flight phase transitions and schedules the measurement noise.
    fn apply_phase(&mut self, phase: FlightPhase) {
        if self.phase != Some(phase) {
            log::debug!("Flight phase changed from {:?} to {:?}", self.phase, phase);
        }

        match reset_on_transition(self.phase, phase) {
            Some(ResetKind::Full) => self.filter.reset(),
            Some(ResetKind::Ignition) => self.filter.reset_for_ignition(),
            None => {}
        }
        self.phase = Some(phase);

        let Some(schedule) = &self.noise_schedule else {
            return;
        };

        let velocity = self.filter.estimate().velocity;
        if let Some(noise) = schedule.measurement_noise(phase, velocity) {
            log::trace!("Scheduled measurement noise {:?}", noise);
            self.filter.set_measurement_noise(noise);
        }
    }

    /// Runs the update variant the barometer faults allow.
    fn correct(&mut self, active: &[bool; BARO], heights: &[T; BARO]) -> Result<(), FilterError> {
        let faulty = active.iter().filter(|&&is_active| !is_active).count();

        if faulty == BARO {
            return match self.height_loss {
                HeightLossPolicy::TrustPrediction => {
                    log::warn!("All barometers are faulty, trusting prediction");
                    self.filter.trust_prediction();
                    Ok(())
                }
                HeightLossPolicy::Reject => {
                    log::error!("All barometers are faulty");
                    Err(FilterError::AllBarometersFaulty)
                }
            };
        }

        if faulty > self.tolerated_barometer_faults {
            log::error!(
                "{} barometers are faulty, at most {} can be eliminated",
                faulty,
                self.tolerated_barometer_faults
            );
            return Err(FilterError::UnsupportedBarometerFaults {
                faulty,
                tolerated: self.tolerated_barometer_faults,
            });
        }

        self.filter.update_active(active, heights)
    }

    /// Gets the corrected state estimate.
    pub fn estimate(&self) -> StateEstimate<T> {
        self.filter.estimate()
    }

    /// Gets the flight phase of the last tick.
    pub fn phase(&self) -> Option<FlightPhase> {
        self.phase
    }

    /// Gets the underlying filter.
    pub fn filter(&self) -> &FilterState<T, BARO> {
        &self.filter
    }

    /// Gets the underlying filter for manual resets.
    pub fn filter_mut(&mut self) -> &mut FilterState<T, BARO> {
        &mut self.filter
    }
}
