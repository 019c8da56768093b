use crate::num_traits::FilterScalar;
use crate::types::SensorFaultVector;

/// Averages the vertical acceleration of the healthy IMUs.
///
/// Falls back to the healthy high-g accelerometers when every IMU is faulty and returns
/// `None` when no acceleration sensor is left.
pub fn average_acceleration<T, const IMU: usize, const ACC: usize, const BARO: usize, const MAG: usize>(
    imu: &[T; IMU],
    high_g: &[T; ACC],
    faults: &SensorFaultVector<IMU, ACC, BARO, MAG>,
) -> Option<T>
where
    T: FilterScalar,
{
    mean_of_healthy(imu, &faults.imu).or_else(|| mean_of_healthy(high_g, &faults.high_g))
}

/// Averages the pressure of the healthy barometers, or returns `None` if every barometer is faulty.
pub fn average_pressure<T, const IMU: usize, const ACC: usize, const BARO: usize, const MAG: usize>(
    pressures: &[T; BARO],
    faults: &SensorFaultVector<IMU, ACC, BARO, MAG>,
) -> Option<T>
where
    T: FilterScalar,
{
    mean_of_healthy(pressures, &faults.barometer)
}

fn mean_of_healthy<T>(values: &[T], faulty: &[bool]) -> Option<T>
where
    T: FilterScalar,
{
    let (sum, count) = values
        .iter()
        .zip(faulty)
        .filter_map(|(&value, &faulty)| (!faulty).then_some(value))
        .fold((T::zero(), T::zero()), |(sum, count), value| {
            (sum + value, count + T::one())
        });

    if count == T::zero() {
        None
    } else {
        Some(sum / count)
    }
}

/// The averaged sample of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedSample<T> {
    /// The averaged acceleration, or the last good value if every acceleration sensor is faulty.
    pub acceleration: T,
    /// The averaged pressure, or the last good value if every barometer is faulty.
    pub pressure: T,
    /// Whether every acceleration sensor was faulty.
    pub acceleration_lost: bool,
    /// Whether every barometer was faulty.
    pub pressure_lost: bool,
}

/// Averages sensor classes and holds the last good value of a class that is lost entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorAggregator<T> {
    acceleration: T,
    pressure: T,
}

impl<T> SensorAggregator<T>
where
    T: FilterScalar,
{
    /// Initializes a new [`SensorAggregator`] with the values to hold until the first good sample.
    pub const fn new(acceleration: T, pressure: T) -> Self {
        Self {
            acceleration,
            pressure,
        }
    }

    /// Averages one tick of raw samples.
    ///
    /// ## Arguments
    /// * `imu` - The acceleration along the calibrated axis of each IMU.
    /// * `high_g` - The acceleration along the calibrated axis of each high-g accelerometer.
    /// * `pressures` - The pressure of each barometer.
    /// * `faults` - The fault flags of every sensor.
    pub fn aggregate<const IMU: usize, const ACC: usize, const BARO: usize, const MAG: usize>(
        &mut self,
        imu: &[T; IMU],
        high_g: &[T; ACC],
        pressures: &[T; BARO],
        faults: &SensorFaultVector<IMU, ACC, BARO, MAG>,
    ) -> AggregatedSample<T> {
        let acceleration = average_acceleration(imu, high_g, faults);
        let pressure = average_pressure(pressures, faults);

        if let Some(acceleration) = acceleration {
            self.acceleration = acceleration;
        } else {
            log::warn!("No acceleration sensor left, holding last value");
        }

        if let Some(pressure) = pressure {
            self.pressure = pressure;
        } else {
            log::warn!("No barometer left, holding last value");
        }

        AggregatedSample {
            acceleration: self.acceleration,
            pressure: self.pressure,
            acceleration_lost: acceleration.is_none(),
            pressure_lost: pressure.is_none(),
        }
    }
}

impl<T> Default for SensorAggregator<T>
where
    T: FilterScalar,
{
    fn default() -> Self {
        Self::new(T::zero(), T::zero())
    }
}
