use crate::error::FilterError;
use crate::kalman::{FilterState, STATES};
use crate::matrix::{ColumnVector, Matrix};
use crate::num_traits::FilterScalar;

impl<T, const BARO: usize> FilterState<T, BARO>
where
    T: FilterScalar,
{
    /// Corrects the prediction with the height readings of the active barometers.
    ///
    /// Readings of inactive barometers are ignored. On error the corrected state, covariance
    /// and gain keep their previous values.
    ///
    /// ## Arguments
    /// * `active` - Whether each barometer is trusted.
    /// * `heights` - The height reading of each barometer, in meters.
    pub fn update_active(
        &mut self,
        active: &[bool; BARO],
        heights: &[T; BARO],
    ) -> Result<(), FilterError> {
        match active.iter().filter(|&&is_active| is_active).count() {
            0 => Err(FilterError::NoActiveObservations),
            1 => self.update_subset::<1>(active, heights),
            2 => self.update_subset::<2>(active, heights),
            3 => self.update_subset::<3>(active, heights),
            // `BAROMETER_COUNT_CHECK` rejects more than three barometers when `new` is compiled.
            _ => unreachable!("at most three barometers are supported"),
        }
    }

    /// Corrects the prediction with all barometers.
    pub fn update(&mut self, heights: &[T; BARO]) -> Result<(), FilterError> {
        self.update_active(&[true; BARO], heights)
    }

    /// Runs the update over the `J` active barometers.
    fn update_subset<const J: usize>(
        &mut self,
        active: &[bool; BARO],
        heights: &[T; BARO],
    ) -> Result<(), FilterError> {
        let rows = active_indices::<J, BARO>(active);

        // Select the rows of the trusted sensors.
        let h: Matrix<T, J, STATES> = Matrix::from_fn(|i, j| self.h_full[(rows[i], j)]);
        let h_t: Matrix<T, STATES, J> = Matrix::from_fn(|i, j| self.h_full_t[(i, rows[j])]);
        let r: Matrix<T, J, J> = Matrix::from_fn(|i, j| self.r_full[(rows[i], rows[j])]);
        let y: ColumnVector<T, J> = ColumnVector::from_fn(|i, _| heights[rows[i]]);

        // S = H·P·Hᵀ + R
        let p_ht = self.p_hat * h_t;
        let s = h * p_ht + r;
        let s_inv = s.inverse(T::zero()).inspect_err(|_| {
            log::warn!(
                "Innovation covariance of {} barometers is singular, skipping update",
                J
            )
        })?;

        let gain = p_ht * s_inv;
        let innovation = y - h * self.x_hat;

        self.x_bar = self.x_hat + gain * innovation;
        self.p_bar = (Matrix::<T, STATES, STATES>::identity() - gain * h) * self.p_hat;

        self.gain = Matrix::zeros();
        for (col, &row) in rows.iter().enumerate() {
            for state in 0..STATES {
                self.gain[(state, row)] = gain[(state, col)];
            }
        }

        self.panic_if_nan();
        Ok(())
    }
}

/// Returns the indices of the first `J` active sensors.
fn active_indices<const J: usize, const N: usize>(active: &[bool; N]) -> [usize; J] {
    let mut indices = [0; J];
    let selected = active
        .iter()
        .enumerate()
        .filter_map(|(index, &is_active)| is_active.then_some(index));
    for (slot, index) in indices.iter_mut().zip(selected) {
        *slot = index;
    }
    indices
}
