use core::fmt::Debug;
use num_traits::Float;

/// Scalar types the altitude filter can be instantiated with, i.e. `f32` and `f64`.
///
/// Only the operations available without the standard library are required; `num-traits` is built
/// with `libm` for the few transcendental functions the preprocessing uses.
pub trait FilterScalar: Float + Default + Debug {
    /// Returns the value `2`.
    #[inline(always)]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Returns half of the value.
    #[inline(always)]
    fn half(self) -> Self {
        self / Self::two()
    }
}

impl<T> FilterScalar for T where T: Float + Default + Debug {}

pub trait StandardGravity<T> {
    /// The gravitational acceleration subtracted from the vertical accelerometer axis, in m/s².
    const GRAVITY: T;
}

impl StandardGravity<f32> for f32 {
    const GRAVITY: f32 = 9.81;
}

impl StandardGravity<f64> for f64 {
    const GRAVITY: f64 = 9.81;
}

/// Constants of the barometric height formula of the international standard atmosphere.
pub trait BarometricConstants<T> {
    /// Inverse of the exponent `g·M / (R·L)`, i.e. `1 / 5.257`.
    const PRESSURE_EXPONENT: T;

    /// Offset from degrees Celsius to Kelvin.
    const CELSIUS_TO_KELVIN: T;

    /// Temperature lapse rate of the troposphere, in K/m.
    const LAPSE_RATE: T;
}

impl BarometricConstants<f32> for f32 {
    const PRESSURE_EXPONENT: f32 = 1.0 / 5.257;
    const CELSIUS_TO_KELVIN: f32 = 273.15;
    const LAPSE_RATE: f32 = 0.0065;
}

impl BarometricConstants<f64> for f64 {
    const PRESSURE_EXPONENT: f64 = 1.0 / 5.257;
    const CELSIUS_TO_KELVIN: f64 = 273.15;
    const LAPSE_RATE: f64 = 0.0065;
}
