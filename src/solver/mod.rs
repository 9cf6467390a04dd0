//! The solver stack: [`BaseSolver`], [`HomotopyWrapper`], [`CachingWrapper`]
//!
//! All three implement [`Solver`], the capability set shared by the whole
//! stack. Wrapping is compile-time generic (`HomotopyWrapper<S: Solver>`,
//! `CachingWrapper<S: Solver>`) rather than dispatched through a trait
//! object, so the audio-rate hot path pays no per-call dispatch cost.
mod base;
mod caching;
mod homotopy;

pub use base::BaseSolver;
pub use caching::CachingWrapper;
pub use homotopy::HomotopyWrapper;

use nalgebra::DVector;

use crate::failure::FailureReason;

/// The capability set shared by the base solver and its wrappers.
///
/// `solve` always returns a vector, never fails: call [`Solver::has_converged`]
/// afterward to check whether the result is usable.
pub trait Solver {
    /// Attempt to solve `F(p, .) = 0`, returning the best `z` found.
    fn solve(&mut self, p: &DVector<f64>) -> DVector<f64>;

    /// Whether the most recent `solve` call converged.
    fn has_converged(&self) -> bool;

    /// Iteration count of the most recent `solve` call.
    fn needed_iterations(&self) -> usize;

    /// Why the most recent `solve` call failed, if it did.
    fn last_failure(&self) -> Option<FailureReason>;

    /// Set the squared-residual convergence threshold.
    fn set_tolerance(&mut self, tol: f64);

    /// Force a new extrapolation origin, re-evaluating the oracle and
    /// refactoring its Jacobian.
    fn set_origin(&mut self, p: DVector<f64>, z: DVector<f64>);

    /// The current extrapolation origin `(p, z)`.
    fn get_origin(&self) -> (&DVector<f64>, &DVector<f64>);
}
