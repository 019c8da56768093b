use crate::num_traits::{BarometricConstants, FilterScalar, StandardGravity};

/// Converts the reading of the calibrated accelerometer axis into vertical acceleration.
///
/// ## Arguments
/// * `reading` - The acceleration along the axis most aligned with the vertical, in m/s².
/// * `calibration_factor` - The cosine of the angle between that axis and the vertical.
pub fn vertical_acceleration<T>(reading: T, calibration_factor: T) -> T
where
    T: FilterScalar + StandardGravity<T>,
{
    reading / calibration_factor - T::GRAVITY
}

/// Calculates the height above the reference pressure level with the barometric formula.
///
/// ## Arguments
/// * `reference_pressure` - The pressure at ground level, in Pa.
/// * `pressure` - The current pressure, in Pa.
/// * `reference_temperature` - The temperature at ground level, in °C.
pub fn altitude_above_ground<T>(reference_pressure: T, pressure: T, reference_temperature: T) -> T
where
    T: FilterScalar + BarometricConstants<T>,
{
    let ratio = (pressure / reference_pressure).powf(T::PRESSURE_EXPONENT);
    -(ratio - T::one()) * (reference_temperature + T::CELSIUS_TO_KELVIN) / T::LAPSE_RATE
}

/// Calculates the height above ground of every barometer.
pub fn heights_above_ground<T, const BARO: usize>(
    reference_pressure: T,
    pressures: &[T; BARO],
    reference_temperature: T,
) -> [T; BARO]
where
    T: FilterScalar + BarometricConstants<T>,
{
    pressures.map(|pressure| {
        altitude_above_ground(reference_pressure, pressure, reference_temperature)
    })
}
