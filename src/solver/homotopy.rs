//! Parameter-space bisection continuation
use nalgebra::DVector;

use crate::config::SolverTuning;
use crate::failure::FailureReason;
use crate::log::SolverLog;

use super::Solver;

/// Retries a failed solve by walking `p` along the straight line from the
/// inner solver's current origin to the requested target, bisecting the
/// step whenever an intermediate point fails to converge.
///
/// Delegates [`Solver::set_tolerance`], [`Solver::set_origin`],
/// [`Solver::has_converged`] and [`Solver::get_origin`] to the inner
/// solver; [`Solver::needed_iterations`] reports the inner solver's
/// iteration count from the most recently attempted inner solve.
pub struct HomotopyWrapper<S: Solver> {
    inner: S,
    scratch: DVector<f64>,
    tuning: SolverTuning,
    log: SolverLog,
}

impl<S: Solver> HomotopyWrapper<S> {
    pub fn new(inner: S) -> Self {
        Self::with_tuning(inner, SolverTuning::default())
    }

    pub fn with_tuning(inner: S, tuning: SolverTuning) -> Self {
        HomotopyWrapper {
            scratch: DVector::zeros(0),
            inner,
            tuning,
            log: SolverLog::new(),
        }
    }

    pub fn set_tuning(&mut self, tuning: SolverTuning) {
        self.tuning = tuning;
    }

    /// Access the wrapped solver (e.g. to inspect cache statistics when
    /// composed with [`super::CachingWrapper`]).
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Solver> Solver for HomotopyWrapper<S> {
    fn solve(&mut self, p_target: &DVector<f64>) -> DVector<f64> {
        let z = self.inner.solve(p_target);
        if self.inner.has_converged() {
            return z;
        }

        let p_start = self.inner.get_origin().0.clone();
        self.scratch = p_start.clone();

        let mut best_a = 0.0_f64;
        let mut a = 0.5_f64;
        let mut last_z = z;
        let mut bisections = 0usize;

        while best_a < 1.0 && a > 0.0 {
            if bisections >= self.tuning.max_bisections {
                self.log.record("homotopy bisection cap reached");
                break;
            }
            bisections += 1;

            self.scratch = &p_start * (1.0 - a) + p_target * a;
            last_z = self.inner.solve(&self.scratch);

            if self.inner.has_converged() {
                self.log.record("homotopy step converged");
                best_a = a;
                a = 1.0;
            } else {
                a = (a + best_a) / 2.0;
            }
        }

        last_z
    }

    fn has_converged(&self) -> bool {
        self.inner.has_converged()
    }

    fn needed_iterations(&self) -> usize {
        self.inner.needed_iterations()
    }

    fn last_failure(&self) -> Option<FailureReason> {
        self.inner.last_failure()
    }

    fn set_tolerance(&mut self, tol: f64) {
        self.inner.set_tolerance(tol);
    }

    fn set_origin(&mut self, p: DVector<f64>, z: DVector<f64>) {
        self.inner.set_origin(p, z);
    }

    fn get_origin(&self) -> (&DVector<f64>, &DVector<f64>) {
        self.inner.get_origin()
    }
}
