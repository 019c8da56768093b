/// Per-sensor fault flags as decided by the upstream fault detection.
///
/// `IMU` inertial measurement units, `ACC` high-g accelerometers, `BARO` barometers and
/// `MAG` magnetometers. A `true` flag marks the sensor as faulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorFaultVector<const IMU: usize, const ACC: usize, const BARO: usize, const MAG: usize>
{
    pub imu: [bool; IMU],
    pub high_g: [bool; ACC],
    pub barometer: [bool; BARO],
    pub magnetometer: [bool; MAG],
}

impl<const IMU: usize, const ACC: usize, const BARO: usize, const MAG: usize>
    SensorFaultVector<IMU, ACC, BARO, MAG>
{
    /// Returns a fault vector with every sensor healthy.
    pub const fn healthy() -> Self {
        Self {
            imu: [false; IMU],
            high_g: [false; ACC],
            barometer: [false; BARO],
            magnetometer: [false; MAG],
        }
    }

    /// Marks the specified IMU as faulty.
    pub fn with_faulty_imu(mut self, index: usize) -> Self {
        self.imu[index] = true;
        self
    }

    /// Marks the specified high-g accelerometer as faulty.
    pub fn with_faulty_high_g(mut self, index: usize) -> Self {
        self.high_g[index] = true;
        self
    }

    /// Marks the specified barometer as faulty.
    pub fn with_faulty_barometer(mut self, index: usize) -> Self {
        self.barometer[index] = true;
        self
    }

    /// Marks the specified magnetometer as faulty.
    pub fn with_faulty_magnetometer(mut self, index: usize) -> Self {
        self.magnetometer[index] = true;
        self
    }

    pub fn faulty_imu_count(&self) -> usize {
        count(&self.imu)
    }

    pub fn faulty_high_g_count(&self) -> usize {
        count(&self.high_g)
    }

    pub fn faulty_barometer_count(&self) -> usize {
        count(&self.barometer)
    }

    pub fn faulty_magnetometer_count(&self) -> usize {
        count(&self.magnetometer)
    }

    /// The number of sensors providing vertical acceleration, i.e. IMUs and high-g accelerometers.
    pub const fn acceleration_sensor_count(&self) -> usize {
        IMU + ACC
    }

    /// The number of faulty sensors providing vertical acceleration.
    pub fn faulty_acceleration_count(&self) -> usize {
        self.faulty_imu_count() + self.faulty_high_g_count()
    }

    /// Returns `true` if no acceleration sensor is left to drive the prediction.
    pub fn all_acceleration_faulty(&self) -> bool {
        self.faulty_acceleration_count() == self.acceleration_sensor_count()
    }

    /// Returns `true` if no barometer is left to correct the prediction.
    pub fn all_barometers_faulty(&self) -> bool {
        self.faulty_barometer_count() == BARO
    }

    /// Returns the trusted barometers, i.e. the negated barometer fault flags.
    pub fn active_barometers(&self) -> [bool; BARO] {
        self.barometer.map(|faulty| !faulty)
    }
}

impl<const IMU: usize, const ACC: usize, const BARO: usize, const MAG: usize> Default
    for SensorFaultVector<IMU, ACC, BARO, MAG>
{
    fn default() -> Self {
        Self::healthy()
    }
}

fn count(flags: &[bool]) -> usize {
    flags.iter().filter(|&&faulty| faulty).count()
}
