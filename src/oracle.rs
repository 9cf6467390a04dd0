//! The solver stack operates on an [`Oracle`]
//!
//! A usual rootfinding algorithm operates on a function f(z) -> r. Here the
//! function additionally depends on a parameter vector `p` that changes from
//! call to call, and the solver also needs the sensitivity of the residual
//! to `p` (the parameter Jacobian) to extrapolate a warm start.
//!
//! The oracle is pure with respect to `p` and `z`: a call to
//! [`Oracle::evaluate`] fully overwrites the residual, Jacobian and
//! parameter-Jacobian buffers from the given `p` and `z`, with no
//! dependency on the history of previous calls. The oracle owns its
//! buffers; callers must not retain references to them across the next
//! call to `evaluate`.
extern crate nalgebra;

use nalgebra::{DMatrix, DVector};

/// Minimal requirement for a model to interact with the solver stack.
///
/// `evaluate` is the sole entry point: it must populate the residual `r`
/// (length [`Oracle::problem_size`]), the Jacobian `J = dF/dz`
/// (`problem_size` x `problem_size`) and the parameter Jacobian
/// `Jp = dF/dp` (`problem_size` x [`Oracle::parameter_size`]).
///
/// Non-finite entries in `r` or `J` are a legitimate signal, not an
/// error: the solver interprets them as a failed evaluation (see
/// [`crate::failure::FailureReason::NonFiniteEvaluation`]).
pub trait Oracle {
    /// Dimension of the unknown `z` (N).
    fn problem_size(&self) -> usize;

    /// Dimension of the parameter `p` (P).
    fn parameter_size(&self) -> usize;

    /// Evaluate F and its Jacobians at `(p, z)`, overwriting the internal
    /// buffers returned by [`Oracle::residual`], [`Oracle::jacobian`] and
    /// [`Oracle::parameter_jacobian`].
    fn evaluate(&mut self, p: &DVector<f64>, z: &DVector<f64>);

    /// Residual `r = F(p, z)` from the most recent `evaluate` call.
    fn residual(&self) -> &DVector<f64>;

    /// Jacobian `J = dF/dz` from the most recent `evaluate` call.
    fn jacobian(&self) -> &DMatrix<f64>;

    /// Parameter Jacobian `Jp = dF/dp` from the most recent `evaluate` call.
    fn parameter_jacobian(&self) -> &DMatrix<f64>;
}

/// Adapts a closure computing `(r, J, Jp)` directly into the [`Oracle`]
/// trait, for small or scalar problems that do not warrant a dedicated
/// type.
///
/// The stacked solvers never depend on `FnOracle` itself; it exists as a
/// convenience for tests and simple callers that would rather write a
/// closure than a dedicated type.
pub struct FnOracle<F>
where
    F: FnMut(&DVector<f64>, &DVector<f64>) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>),
{
    problem_size: usize,
    parameter_size: usize,
    func: F,
    residual: DVector<f64>,
    jacobian: DMatrix<f64>,
    parameter_jacobian: DMatrix<f64>,
}

impl<F> FnOracle<F>
where
    F: FnMut(&DVector<f64>, &DVector<f64>) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>),
{
    pub fn new(problem_size: usize, parameter_size: usize, func: F) -> Self {
        FnOracle {
            problem_size,
            parameter_size,
            func,
            residual: DVector::from_element(problem_size, f64::NAN),
            jacobian: DMatrix::zeros(problem_size, problem_size),
            parameter_jacobian: DMatrix::zeros(problem_size, parameter_size),
        }
    }
}

impl<F> Oracle for FnOracle<F>
where
    F: FnMut(&DVector<f64>, &DVector<f64>) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>),
{
    fn problem_size(&self) -> usize {
        self.problem_size
    }

    fn parameter_size(&self) -> usize {
        self.parameter_size
    }

    fn evaluate(&mut self, p: &DVector<f64>, z: &DVector<f64>) {
        let (r, j, jp) = (self.func)(p, z);
        self.residual = r;
        self.jacobian = j;
        self.parameter_jacobian = jp;
    }

    fn residual(&self) -> &DVector<f64> {
        &self.residual
    }

    fn jacobian(&self) -> &DMatrix<f64> {
        &self.jacobian
    }

    fn parameter_jacobian(&self) -> &DMatrix<f64> {
        &self.parameter_jacobian
    }
}
