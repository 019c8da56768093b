use crate::impl_standard_traits;
use crate::matrix::ColumnVector;
use uniform_array_derive::UniformArray;

/// The corrected vertical state published after every filter tick.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct StateEstimate<T> {
    /// The altitude above the calibration point, in meters.
    pub altitude: T,
    /// The vertical velocity, in meters per second; positive is up.
    pub velocity: T,
    /// The third state channel, in meters per second squared.
    ///
    /// This is the vertical acceleration in the three-barometer model and the accelerometer
    /// offset in the single-barometer model.
    pub acceleration: T,
}

impl<T> StateEstimate<T> {
    /// Initializes a new [`StateEstimate`] instance.
    #[inline(always)]
    pub const fn new(altitude: T, velocity: T, acceleration: T) -> Self {
        Self {
            altitude,
            velocity,
            acceleration,
        }
    }
}

impl<T> From<ColumnVector<T, 3>> for StateEstimate<T>
where
    T: Copy,
{
    fn from(value: ColumnVector<T, 3>) -> Self {
        let [altitude, velocity, acceleration] = value.to_column();
        Self::new(altitude, velocity, acceleration)
    }
}

impl<T> From<StateEstimate<T>> for [T; 3] {
    fn from(value: StateEstimate<T>) -> Self {
        [value.altitude, value.velocity, value.acceleration]
    }
}

impl_standard_traits!(StateEstimate, T, [altitude, velocity, acceleration]);
