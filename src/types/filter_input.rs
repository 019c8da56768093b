use crate::types::{FlightPhase, SensorFaultVector};

/// Everything the filter consumes in one tick.
///
/// The integration layer guarantees that the values stay stable for the duration of the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterInput<T, const IMU: usize, const ACC: usize, const BARO: usize, const MAG: usize> {
    /// The fault flags of every sensor.
    pub faults: SensorFaultVector<IMU, ACC, BARO, MAG>,
    /// The fault-weighted averaged vertical acceleration, gravity removed, in m/s².
    pub acceleration: T,
    /// The height observation of each barometer, in meters above ground.
    ///
    /// Readings of faulty barometers are ignored.
    pub heights: [T; BARO],
    /// The current flight phase.
    pub phase: FlightPhase,
}

impl<T, const IMU: usize, const ACC: usize, const BARO: usize, const MAG: usize>
    FilterInput<T, IMU, ACC, BARO, MAG>
{
    /// Initializes a new [`FilterInput`] instance with every sensor healthy.
    pub const fn new(acceleration: T, heights: [T; BARO], phase: FlightPhase) -> Self {
        Self {
            faults: SensorFaultVector::healthy(),
            acceleration,
            heights,
            phase,
        }
    }

    /// Replaces the fault vector.
    pub fn with_faults(mut self, faults: SensorFaultVector<IMU, ACC, BARO, MAG>) -> Self {
        self.faults = faults;
        self
    }
}
