//! Observable, non-raising solve failures
//!
//! The solver stack never raises: `solve` always returns a `z`, and
//! `has_converged()` is the only way to learn whether it is usable.
//! [`FailureReason`] is the finer-grained diagnostic of *why* the most
//! recent attempt did not converge, following the same manual
//! `Display`/`Debug`/`Error` idiom used for error enums elsewhere in this
//! style of solver crate (no `thiserror`: a closed, three-variant enum
//! with no composition needs beyond `Display`).
use std::error::Error;
use std::fmt;

/// Why the most recent `solve` call did not converge.
///
/// All three variants are non-fatal: the solver remains reusable and its
/// prior origin is left untouched.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FailureReason {
    /// The oracle produced a NaN or infinite entry in `r` or `J`.
    NonFiniteEvaluation,
    /// LU factorization of `J` detected a zero (or unusable) pivot.
    SingularJacobian,
    /// `maxiter` Newton steps were taken without `||r||^2 < tol`.
    IterationsExhausted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NonFiniteEvaluation => {
                write!(f, "oracle evaluation produced a non-finite residual or Jacobian")
            }
            Self::SingularJacobian => write!(f, "Jacobian factorization was singular"),
            Self::IterationsExhausted => {
                write!(f, "iteration budget exhausted without reaching the convergence tolerance")
            }
        }
    }
}

impl Error for FailureReason {}
