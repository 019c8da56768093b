//! Fixed-size dense matrices and the small cofactor-expansion kernel used by the filter.
//!
//! The kernel (determinant, adjoint, inverse) is purpose-built for square matrices of order
//! one to three; larger orders are rejected at compile time.

use crate::num_traits::FilterScalar;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, Index, IndexMut, Mul, Sub};

/// The largest square matrix order the cofactor kernel accepts.
pub const MAX_KERNEL_DIMENSION: usize = 3;

/// The matrix handed to [`Matrix::inverse`] has a determinant of exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("matrix is singular")]
pub struct SingularMatrixError;

/// A row-major `R`×`C` matrix stored inline.
#[derive(Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Matrix<T, const R: usize, const C: usize>([[T; C]; R]);

/// A column vector of `R` elements.
pub type ColumnVector<T, const R: usize> = Matrix<T, R, 1>;

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Builds a matrix from its rows.
    #[inline(always)]
    pub const fn from_rows(rows: [[T; C]; R]) -> Self {
        Self(rows)
    }

    /// Builds a matrix by evaluating `f(row, column)` for every element.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        Self(core::array::from_fn(|i| core::array::from_fn(|j| f(i, j))))
    }

    /// Returns the rows of the matrix.
    #[inline(always)]
    pub const fn rows(&self) -> &[[T; C]; R] {
        &self.0
    }

    /// Consumes the matrix and returns its rows.
    #[inline(always)]
    pub fn into_rows(self) -> [[T; C]; R] {
        self.0
    }
}

impl<T, const R: usize, const C: usize> Matrix<T, R, C>
where
    T: FilterScalar,
{
    /// Returns the all-zero matrix.
    #[inline]
    pub fn zeros() -> Self {
        Self([[T::zero(); C]; R])
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Matrix<T, C, R> {
        Matrix::from_fn(|i, j| self.0[j][i])
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        Self::from_fn(|i, j| self.0[i][j] * factor)
    }

    /// Returns `true` if any element is NaN.
    pub fn has_nan(&self) -> bool {
        self.0.iter().flatten().any(|value| value.is_nan())
    }
}

impl<T, const R: usize> Matrix<T, R, 1>
where
    T: Copy,
{
    /// Builds a column vector.
    #[inline(always)]
    pub fn from_column(values: [T; R]) -> Self {
        Self(values.map(|value| [value]))
    }

    /// Returns the elements of a column vector.
    pub fn to_column(&self) -> [T; R] {
        core::array::from_fn(|i| self.0[i][0])
    }
}

impl<T, const N: usize> Matrix<T, N, N>
where
    T: FilterScalar,
{
    /// Evaluates to `()` only for orders the cofactor kernel supports.
    const KERNEL_DIMENSION_CHECK: () = assert!(
        N >= 1 && N <= MAX_KERNEL_DIMENSION,
        "the cofactor kernel only supports matrices of order 1 to 3"
    );

    /// Returns the identity matrix.
    pub fn identity() -> Self {
        Self::from_diagonal([T::one(); N])
    }

    /// Returns a diagonal matrix with the specified diagonal.
    pub fn from_diagonal(diagonal: [T; N]) -> Self {
        Self::from_fn(|i, j| if i == j { diagonal[i] } else { T::zero() })
    }

    /// Returns the main diagonal.
    pub fn diagonal(&self) -> [T; N] {
        core::array::from_fn(|i| self.0[i][i])
    }

    /// Returns the sum of the main diagonal.
    pub fn trace(&self) -> T {
        self.diagonal()
            .into_iter()
            .fold(T::zero(), |sum, value| sum + value)
    }

    /// Builds the minor of the leading `n`×`n` block with row `p` and column `q` removed.
    ///
    /// The result occupies the leading `(n-1)`×`(n-1)` block; all other elements are zero.
    pub fn cofactor(&self, p: usize, q: usize, n: usize) -> Self {
        debug_assert!(p < n && q < n && n <= N);
        let mut minor = Self::zeros();
        let (mut i, mut j) = (0, 0);
        for row in 0..n {
            for col in 0..n {
                if row == p || col == q {
                    continue;
                }

                minor.0[i][j] = self.0[row][col];
                j += 1;
                if j == n - 1 {
                    j = 0;
                    i += 1;
                }
            }
        }
        minor
    }

    /// Calculates the determinant of the leading `n`×`n` block by Laplace expansion along the first row.
    pub fn determinant_of_order(&self, n: usize) -> T {
        debug_assert!(n >= 1 && n <= N);
        if n == 1 {
            return self.0[0][0];
        }

        let mut determinant = T::zero();
        let mut sign = T::one();
        for f in 0..n {
            let minor = self.cofactor(0, f, n);
            determinant = determinant + sign * self.0[0][f] * minor.determinant_of_order(n - 1);
            sign = -sign;
        }
        determinant
    }

    /// Calculates the determinant.
    pub fn determinant(&self) -> T {
        #[allow(clippy::let_unit_value)]
        let () = Self::KERNEL_DIMENSION_CHECK;
        self.determinant_of_order(N)
    }

    /// Calculates the adjoint (adjugate), i.e. the transposed matrix of signed cofactors.
    pub fn adjoint(&self) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::KERNEL_DIMENSION_CHECK;
        if N == 1 {
            return Self::identity();
        }

        let mut adjoint = Self::zeros();
        for i in 0..N {
            for j in 0..N {
                let minor = self.cofactor(i, j, N);
                let sign = if (i + j) % 2 == 0 { T::one() } else { -T::one() };
                adjoint.0[j][i] = sign * minor.determinant_of_order(N - 1);
            }
        }
        adjoint
    }

    /// Inverts the matrix after adding `damping²` to its diagonal.
    ///
    /// A `damping` of zero disables the regularization. Only a determinant of exactly zero
    /// is reported as singular.
    pub fn inverse(&self, damping: T) -> Result<Self, SingularMatrixError> {
        let damped = *self + Self::identity().scale(damping * damping);
        let determinant = damped.determinant();
        if determinant == T::zero() {
            return Err(SingularMatrixError);
        }

        Ok(damped.adjoint().scale(determinant.recip()))
    }
}

impl<T, const R: usize, const C: usize> Default for Matrix<T, R, C>
where
    T: FilterScalar,
{
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T, const R: usize, const C: usize> Debug for Matrix<T, R, C>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Matrix<T, R, C> {
    type Output = T;

    #[inline(always)]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.0[row][col]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<T, R, C> {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.0[row][col]
    }
}

impl<T, const R: usize, const C: usize> Add for Matrix<T, R, C>
where
    T: FilterScalar,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_fn(|i, j| self.0[i][j] + rhs.0[i][j])
    }
}

impl<T, const R: usize, const C: usize> Sub for Matrix<T, R, C>
where
    T: FilterScalar,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_fn(|i, j| self.0[i][j] - rhs.0[i][j])
    }
}

impl<T, const R: usize, const C: usize, const K: usize> Mul<Matrix<T, C, K>> for Matrix<T, R, C>
where
    T: FilterScalar,
{
    type Output = Matrix<T, R, K>;

    fn mul(self, rhs: Matrix<T, C, K>) -> Self::Output {
        Matrix::from_fn(|i, j| {
            (0..C).fold(T::zero(), |sum, k| sum + self.0[i][k] * rhs.0[k][j])
        })
    }
}
