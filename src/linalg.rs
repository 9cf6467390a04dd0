//! Dense LU factorization with partial pivoting
//!
//! [`DenseLu`] is a thin, named wrapper around nalgebra's partial-pivoting
//! LU decomposition. It exists as its own component (rather than calling
//! `nalgebra::linalg::LU` inline at every call site) so that singularity
//! is surfaced as a first-class `Option`/`bool` rather than a panic on a
//! singular input.
use std::fmt;

use nalgebra::{DMatrix, DVector};

/// LU factorization of a square matrix, with partial pivoting.
///
/// A singular factor (a pivot that nalgebra's solve cannot use) is
/// reported through [`DenseLu::factor`] returning `None`, never through a
/// panic: callers treat it as a solver failure signal ("singular
/// Jacobian").
pub struct DenseLu {
    lu: nalgebra::linalg::LU<f64, nalgebra::Dyn, nalgebra::Dyn>,
}

impl DenseLu {
    /// Factor `matrix`. Returns `None` if the matrix is not invertible.
    pub fn factor(matrix: &DMatrix<f64>) -> Option<Self> {
        let lu = matrix.clone().lu();
        if lu.is_invertible() {
            Some(DenseLu { lu })
        } else {
            None
        }
    }

    /// Solve `J x = rhs` for `x`, i.e. compute `J^-1 * rhs`.
    ///
    /// Returns `None` if the factorization turns out to be singular with
    /// respect to `rhs` (defensive: [`DenseLu::factor`] already rejects
    /// singular matrices, so this should not trigger in practice, but
    /// nalgebra's `solve` is itself fallible and the signal is threaded
    /// through rather than unwrapped).
    pub fn solve(&self, rhs: &DVector<f64>) -> Option<DVector<f64>> {
        self.lu.solve(rhs)
    }
}

impl fmt::Debug for DenseLu {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DenseLu").finish_non_exhaustive()
    }
}
