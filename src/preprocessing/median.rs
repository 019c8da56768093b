use crate::num_traits::FilterScalar;
use core::cmp::Ordering;

/// A running median over the last `N` samples.
///
/// Until `N` samples were seen, the median covers the samples seen so far. For an even
/// number of samples the mean of the two middle samples is returned.
#[derive(Debug, Clone)]
pub struct MedianFilter<T, const N: usize> {
    window: [T; N],
    next: usize,
    filled: usize,
}

impl<T, const N: usize> MedianFilter<T, N>
where
    T: FilterScalar,
{
    pub fn new() -> Self {
        Self {
            window: [T::zero(); N],
            next: 0,
            filled: 0,
        }
    }

    /// Adds a sample and returns the median of the window.
    pub fn filter(&mut self, sample: T) -> T {
        if N == 0 {
            return sample;
        }

        self.window[self.next] = sample;
        self.next = (self.next + 1) % N;
        self.filled = (self.filled + 1).min(N);
        self.median()
    }

    /// Returns the median of the window, or zero if it is empty.
    pub fn median(&self) -> T {
        if self.filled == 0 {
            return T::zero();
        }

        let mut sorted = self.window;
        let samples = &mut sorted[..self.filled];
        samples.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let middle = self.filled / 2;
        if self.filled % 2 == 1 {
            samples[middle]
        } else {
            (samples[middle - 1] + samples[middle]).half()
        }
    }

    /// Discards all samples.
    pub fn clear(&mut self) {
        self.next = 0;
        self.filled = 0;
    }
}

impl<T, const N: usize> Default for MedianFilter<T, N>
where
    T: FilterScalar,
{
    fn default() -> Self {
        Self::new()
    }
}
