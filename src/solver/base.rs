//! Damped-free Newton iteration with extrapolated warm starts
use nalgebra::{DMatrix, DVector};

use crate::config::SolverTuning;
use crate::failure::FailureReason;
use crate::linalg::DenseLu;
use crate::log::SolverLog;
use crate::oracle::Oracle;

use super::Solver;

/// Newton solver for `F(p, z) = 0`, warm-started by first-order
/// extrapolation from the last converged operating point.
///
/// `solve` always returns a value; call [`Solver::has_converged`]
/// afterward to test success. The solver owns its oracle exclusively —
/// wrappers never reach into it.
pub struct BaseSolver<O: Oracle> {
    oracle: O,
    z: DVector<f64>,
    last_z: DVector<f64>,
    last_p: DVector<f64>,
    last_jp: DMatrix<f64>,
    last_jlu: Option<DenseLu>,
    iters: usize,
    converged: bool,
    failure: Option<FailureReason>,
    tuning: SolverTuning,
    log: SolverLog,
}

impl<O: Oracle> BaseSolver<O> {
    /// Construct a solver seeded at `(initial_p, initial_z)`.
    ///
    /// The oracle is evaluated once to populate the extrapolation origin.
    /// `initial_z` is expected to be (close to) a root of
    /// `F(initial_p, .)`; if it is not, the first call to [`Solver::solve`]
    /// is not guaranteed to converge, but construction itself never
    /// fails.
    pub fn new(oracle: O, initial_p: DVector<f64>, initial_z: DVector<f64>) -> Self {
        Self::with_tuning(oracle, initial_p, initial_z, SolverTuning::default())
    }

    /// Construct a solver with non-default tuning constants.
    pub fn with_tuning(
        mut oracle: O,
        initial_p: DVector<f64>,
        initial_z: DVector<f64>,
        tuning: SolverTuning,
    ) -> Self {
        oracle.evaluate(&initial_p, &initial_z);
        let last_jp = oracle.parameter_jacobian().clone();
        let last_jlu = DenseLu::factor(oracle.jacobian());

        BaseSolver {
            z: initial_z.clone(),
            last_z: initial_z,
            last_p: initial_p,
            last_jp,
            last_jlu,
            oracle,
            iters: 0,
            converged: false,
            failure: None,
            tuning,
            log: SolverLog::new(),
        }
    }

    /// Replace the tuning constants used by subsequent solves.
    pub fn set_tuning(&mut self, tuning: SolverTuning) {
        self.tuning = tuning;
    }

    fn extrapolate(&self, p: &DVector<f64>) -> DVector<f64> {
        let delta_p = p - &self.last_p;
        match &self.last_jlu {
            Some(lu) => {
                let jp_dp = &self.last_jp * delta_p;
                match lu.solve(&jp_dp) {
                    Some(correction) => &self.last_z - correction,
                    None => self.last_z.clone(),
                }
            }
            None => self.last_z.clone(),
        }
    }
}

impl<O: Oracle> Solver for BaseSolver<O> {
    fn solve(&mut self, p: &DVector<f64>) -> DVector<f64> {
        self.z = self.extrapolate(p);
        self.converged = false;
        self.failure = None;
        self.iters = 0;

        let mut final_lu: Option<DenseLu> = None;

        for iter in 1..=self.tuning.maxiter {
            self.oracle.evaluate(p, &self.z);
            self.iters = iter;

            let r = self.oracle.residual().clone();
            let j = self.oracle.jacobian().clone();

            if !r.iter().all(|x| x.is_finite()) || !j.iter().all(|x| x.is_finite()) {
                self.failure = Some(FailureReason::NonFiniteEvaluation);
                break;
            }

            let lu = match DenseLu::factor(&j) {
                Some(lu) => lu,
                None => {
                    self.failure = Some(FailureReason::SingularJacobian);
                    break;
                }
            };

            let residual_sq = r.dot(&r);
            if residual_sq < self.tuning.tolerance {
                self.converged = true;
                final_lu = Some(lu);
                break;
            }

            let delta = match lu.solve(&r) {
                Some(delta) => delta,
                None => {
                    self.failure = Some(FailureReason::SingularJacobian);
                    break;
                }
            };
            self.z -= delta;
            final_lu = Some(lu);
        }

        if self.converged {
            self.last_p = p.clone();
            self.last_z = self.z.clone();
            self.last_jp = self.oracle.parameter_jacobian().clone();
            self.last_jlu = final_lu;
            self.log.record("converged: new extrapolation origin installed");
        } else if self.failure.is_none() {
            self.failure = Some(FailureReason::IterationsExhausted);
        }

        if !self.converged {
            self.log.record("solve failed, origin preserved");
        }

        self.z.clone()
    }

    fn has_converged(&self) -> bool {
        self.converged
    }

    fn needed_iterations(&self) -> usize {
        self.iters
    }

    fn last_failure(&self) -> Option<FailureReason> {
        self.failure
    }

    fn set_tolerance(&mut self, tol: f64) {
        self.tuning.tolerance = tol;
    }

    fn set_origin(&mut self, p: DVector<f64>, z: DVector<f64>) {
        self.oracle.evaluate(&p, &z);
        self.last_jp = self.oracle.parameter_jacobian().clone();
        self.last_jlu = DenseLu::factor(self.oracle.jacobian());
        self.last_p = p;
        self.last_z = z.clone();
        self.z = z;
    }

    fn get_origin(&self) -> (&DVector<f64>, &DVector<f64>) {
        (&self.last_p, &self.last_z)
    }
}
