use crate::kalman::FilterState;
use crate::num_traits::FilterScalar;

impl<T, const BARO: usize> FilterState<T, BARO>
where
    T: FilterScalar,
{
    /// Advances the state and covariance by one sampling period.
    ///
    /// ## Arguments
    /// * `acceleration` - The measured vertical acceleration, gravity removed, in m/s².
    pub fn predict(&mut self, acceleration: T) {
        self.x_hat = self.a * self.x_bar + self.b.scale(acceleration);
        self.p_hat = self.a * self.p_bar * self.a_t + self.gqg_t;
    }

    /// Takes the previous corrected values as the prediction, e.g. when no accelerometer is left.
    pub fn freeze_prediction(&mut self) {
        self.x_hat = self.x_bar;
        self.p_hat = self.p_bar;
    }

    /// Takes the prediction as the corrected values, e.g. when no barometer is left.
    pub fn trust_prediction(&mut self) {
        self.x_bar = self.x_hat;
        self.p_bar = self.p_hat;
    }
}
