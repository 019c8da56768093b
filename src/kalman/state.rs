use crate::config::{FilterConfig, ProcessNoise};
use crate::matrix::{ColumnVector, Matrix, MAX_KERNEL_DIMENSION};
use crate::num_traits::FilterScalar;
use crate::types::StateEstimate;

/// The number of filter states: altitude, velocity and acceleration.
pub const STATES: usize = 3;

/// The persistent state of one altitude filter with `BARO` barometers.
///
/// Model matrices are derived once from the sampling period and stay constant; the state,
/// covariances and gain are mutated every tick.
#[derive(Debug, Clone)]
pub struct FilterState<T, const BARO: usize> {
    pub(super) sampling_period: T,
    /// The discretized state transition matrix `A`.
    pub(super) a: Matrix<T, STATES, STATES>,
    pub(super) a_t: Matrix<T, STATES, STATES>,
    /// The control input matrix `B`.
    pub(super) b: ColumnVector<T, STATES>,
    pub(super) process_noise: ProcessNoise<T>,
    /// The process noise contribution `G·Q·Gᵀ`.
    pub(super) gqg_t: Matrix<T, STATES, STATES>,
    pub(super) h_full: Matrix<T, BARO, STATES>,
    pub(super) h_full_t: Matrix<T, STATES, BARO>,
    pub(super) r_full: Matrix<T, BARO, BARO>,
    pub(super) measurement_noise: T,
    /// The predicted state.
    pub(super) x_hat: ColumnVector<T, STATES>,
    /// The corrected state.
    pub(super) x_bar: ColumnVector<T, STATES>,
    pub(super) p_hat: Matrix<T, STATES, STATES>,
    pub(super) p_bar: Matrix<T, STATES, STATES>,
    /// The gain of the last successful update; columns of eliminated barometers are zero.
    pub(super) gain: Matrix<T, STATES, BARO>,
    pub(super) initial_covariance: T,
    pub(super) ignition_covariance: T,
}

impl<T, const BARO: usize> FilterState<T, BARO>
where
    T: FilterScalar,
{
    const BAROMETER_COUNT_CHECK: () = assert!(
        BARO >= 1 && BARO <= MAX_KERNEL_DIMENSION,
        "the filter supports one to three barometers"
    );

    /// Initializes a new [`FilterState`] instance.
    ///
    /// ## Arguments
    /// * `sampling_period` - The fixed time between two ticks, in seconds.
    /// * `config` - The filter tuning.
    pub fn new(sampling_period: T, config: &FilterConfig<T>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::BAROMETER_COUNT_CHECK;

        let dt = sampling_period;
        let dt_sq_half = (dt * dt).half();
        let zero = T::zero();
        let one = T::one();

        let a = Matrix::from_rows([[one, dt, dt_sq_half], [zero, one, dt], [zero, zero, one]]);
        let b = ColumnVector::from_column([dt_sq_half, dt, zero]);
        let gqg_t = Self::process_noise_covariance(dt, &config.process_noise);

        // Every barometer observes the altitude.
        let h_full: Matrix<T, BARO, STATES> =
            Matrix::from_fn(|_, col| if col == 0 { one } else { zero });
        let initial_covariance: Matrix<T, STATES, STATES> =
            Matrix::identity().scale(config.initial_covariance);

        Self {
            sampling_period,
            a,
            a_t: a.transpose(),
            b,
            process_noise: config.process_noise,
            gqg_t,
            h_full,
            h_full_t: h_full.transpose(),
            r_full: Matrix::<T, BARO, BARO>::identity().scale(config.measurement_noise),
            measurement_noise: config.measurement_noise,
            x_hat: ColumnVector::zeros(),
            x_bar: ColumnVector::zeros(),
            p_hat: initial_covariance,
            p_bar: initial_covariance,
            gain: Matrix::zeros(),
            initial_covariance: config.initial_covariance,
            ignition_covariance: config.ignition_covariance,
        }
    }

    /// Builds `G·Q·Gᵀ` for the process noise model.
    fn process_noise_covariance(dt: T, model: &ProcessNoise<T>) -> Matrix<T, STATES, STATES> {
        let zero = T::zero();
        let one = T::one();
        let dt_sq_half = (dt * dt).half();

        match *model {
            ProcessNoise::Acceleration(q) => {
                let g = ColumnVector::from_column([dt_sq_half, dt, zero]);
                g.scale(q) * g.transpose()
            }
            ProcessNoise::AccelerationAndOffset {
                acceleration,
                offset,
            } => {
                let g = Matrix::from_rows([[dt, dt_sq_half], [one, dt], [zero, one]]);
                let q = Matrix::from_diagonal([acceleration, offset]);
                g * q * g.transpose()
            }
        }
    }

    /// Zeros the state and reseeds the covariance; the model matrices are untouched.
    pub fn reset(&mut self) {
        log::debug!("Resetting Kalman filter");
        let covariance: Matrix<T, STATES, STATES> =
            Matrix::identity().scale(self.initial_covariance);
        self.x_hat = ColumnVector::zeros();
        self.x_bar = ColumnVector::zeros();
        self.p_hat = covariance;
        self.p_bar = covariance;
        self.gain = Matrix::zeros();
    }

    /// Reseeds the altitude and velocity variances and clears all cross terms.
    ///
    /// The state and the variance of the third channel are kept.
    pub fn reset_for_ignition(&mut self) {
        log::debug!("Resetting Kalman filter for ignition");
        let mut covariance = Matrix::<T, STATES, STATES>::zeros();
        covariance[(0, 0)] = self.ignition_covariance;
        covariance[(1, 1)] = self.ignition_covariance;
        covariance[(2, 2)] = self.p_bar[(2, 2)];

        self.p_bar = covariance;
        self.p_hat = covariance;
        self.x_hat = self.x_bar;
    }

    /// Sets every diagonal element of the measurement noise covariance to `noise`.
    pub fn set_measurement_noise(&mut self, noise: T) {
        self.measurement_noise = noise;
        self.r_full = Matrix::<T, BARO, BARO>::identity().scale(noise);
    }

    /// Gets the sampling period, in seconds.
    pub fn sampling_period(&self) -> T {
        self.sampling_period
    }

    /// Gets the current measurement noise of a single barometer.
    pub fn measurement_noise(&self) -> T {
        self.measurement_noise
    }

    /// Gets the process noise model.
    pub fn process_noise(&self) -> &ProcessNoise<T> {
        &self.process_noise
    }

    /// Gets the corrected state estimate.
    pub fn estimate(&self) -> StateEstimate<T> {
        StateEstimate::from(self.x_bar)
    }

    /// Gets the state transition matrix `A`.
    pub fn state_transition(&self) -> &Matrix<T, STATES, STATES> {
        &self.a
    }

    /// Gets the control input matrix `B`.
    pub fn control_input(&self) -> &ColumnVector<T, STATES> {
        &self.b
    }

    /// Gets the process noise contribution `G·Q·Gᵀ`.
    pub fn process_noise_contribution(&self) -> &Matrix<T, STATES, STATES> {
        &self.gqg_t
    }

    /// Gets the observation matrix of all barometers.
    pub fn observation_matrix(&self) -> &Matrix<T, BARO, STATES> {
        &self.h_full
    }

    /// Gets the measurement noise covariance of all barometers.
    pub fn measurement_noise_covariance(&self) -> &Matrix<T, BARO, BARO> {
        &self.r_full
    }

    /// Gets the predicted state `x̂`.
    pub fn predicted_state(&self) -> &ColumnVector<T, STATES> {
        &self.x_hat
    }

    /// Gets the corrected state `x̄`.
    pub fn corrected_state(&self) -> &ColumnVector<T, STATES> {
        &self.x_bar
    }

    /// Gets the predicted covariance `P̂`.
    pub fn predicted_covariance(&self) -> &Matrix<T, STATES, STATES> {
        &self.p_hat
    }

    /// Gets the corrected covariance `P̄`.
    pub fn corrected_covariance(&self) -> &Matrix<T, STATES, STATES> {
        &self.p_bar
    }

    /// Gets the gain of the last successful update.
    pub fn gain(&self) -> &Matrix<T, STATES, BARO> {
        &self.gain
    }

    /// Panics in debug builds if the corrected state contains NaN.
    pub(super) fn panic_if_nan(&self) {
        if cfg!(debug_assertions) && self.x_bar.has_nan() {
            panic!("NaN detected in corrected state estimate")
        }
    }
}
