//! Filter tuning.

use crate::noise_schedule::NoiseSchedule;

/// The process noise model, which determines the shape of `G` and `Q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessNoise<T> {
    /// A single acceleration noise input; `G = [Δt²/2, Δt, 0]ᵀ` and `Q` is a scalar.
    Acceleration(T),
    /// Acceleration noise plus a random walk of the accelerometer offset;
    /// `G = [[Δt, Δt²/2], [1, Δt], [0, 1]]` and `Q = diag(acceleration, offset)`.
    AccelerationAndOffset { acceleration: T, offset: T },
}

/// What to do when every barometer is faulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightLossPolicy {
    /// Skip the update and take the prediction as the corrected state.
    #[default]
    TrustPrediction,
    /// Skip the update, keep the previous corrected state and report
    /// [`FilterError::AllBarometersFaulty`](crate::FilterError::AllBarometersFaulty).
    Reject,
}

/// The tuning of an altitude filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig<T> {
    /// The process noise model.
    pub process_noise: ProcessNoise<T>,
    /// The diagonal of the error covariance after initialization and full resets.
    pub initial_covariance: T,
    /// The altitude and velocity variance after the ignition reset.
    pub ignition_covariance: T,
    /// The diagonal of the measurement noise until a schedule changes it.
    pub measurement_noise: T,
    /// The largest number of faulty barometers that can still be eliminated.
    pub tolerated_barometer_faults: usize,
    /// The behavior when every barometer is faulty.
    pub height_loss: HeightLossPolicy,
    /// The phase-adaptive measurement noise, if any.
    pub noise_schedule: Option<NoiseSchedule<T>>,
}

// The presets exist for `f32` and `f64`; callers name the scalar, e.g.
// `FilterConfig::<f32>::single_barometer()`.
macro_rules! impl_presets {
    ($type:ty) => {
        impl FilterConfig<$type> {
            /// A filter for one barometer with an accelerometer-offset state and phase-adaptive noise.
            pub const fn single_barometer() -> Self {
                const NOMINAL_NOISE: $type = 900_000.0;
                const INITIAL_NOISE: $type = 9.0;
                Self {
                    process_noise: ProcessNoise::AccelerationAndOffset {
                        acceleration: 0.004,
                        offset: 1e-6,
                    },
                    initial_covariance: 0.1,
                    ignition_covariance: 0.1,
                    measurement_noise: INITIAL_NOISE,
                    tolerated_barometer_faults: 0,
                    height_loss: HeightLossPolicy::TrustPrediction,
                    noise_schedule: Some(NoiseSchedule {
                        nominal: NOMINAL_NOISE,
                        initial: INITIAL_NOISE,
                        low_velocity: 20.0,
                        high_velocity: 100.0,
                        low_velocity_factor: 0.1,
                        high_velocity_factor: 1.0,
                        exponent: 5,
                    }),
                }
            }

            /// A filter for three redundant barometers of which one may be eliminated.
            pub const fn triple_barometer() -> Self {
                Self {
                    process_noise: ProcessNoise::Acceleration(1.0),
                    initial_covariance: 1e-5,
                    ignition_covariance: 1e-5,
                    measurement_noise: 0.1,
                    tolerated_barometer_faults: 1,
                    height_loss: HeightLossPolicy::TrustPrediction,
                    noise_schedule: None,
                }
            }
        }

        impl Default for FilterConfig<$type> {
            fn default() -> Self {
                Self::single_barometer()
            }
        }
    };
}

impl_presets!(f32);
impl_presets!(f64);
