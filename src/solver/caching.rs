//! Nearest-neighbor warm-start cache over past operating points
use nalgebra::{DMatrix, DVector};

use crate::config::SolverTuning;
use crate::failure::FailureReason;
use crate::kdtree::KdTree;
use crate::log::SolverLog;

use super::Solver;

/// Extends an inner solver by mining a growing history of converged
/// `(p, z)` pairs for a better warm start than the inner solver's own
/// extrapolation origin.
///
/// `ps`/`zs` grow by push (amortized-capacity `Vec`); the k-d tree indexes
/// a prefix of that history (the "indexed prefix"), and the remainder
/// (the "pending suffix") is scanned linearly until the next rebuild.
/// Identical solver interface: [`Solver::set_tolerance`],
/// [`Solver::set_origin`], [`Solver::has_converged`],
/// [`Solver::get_origin`] delegate to the inner solver.
pub struct CachingWrapper<S: Solver> {
    inner: S,
    ps: Vec<DVector<f64>>,
    zs: Vec<DVector<f64>>,
    tree: KdTree,
    indexed: usize,
    new_count: usize,
    new_count_limit: usize,
    tuning: SolverTuning,
    log: SolverLog,
}

impl<S: Solver> CachingWrapper<S> {
    pub fn new(inner: S) -> Self {
        Self::with_tuning(inner, SolverTuning::default())
    }

    pub fn with_tuning(inner: S, tuning: SolverTuning) -> Self {
        CachingWrapper {
            inner,
            ps: Vec::new(),
            zs: Vec::new(),
            tree: KdTree::build(DMatrix::zeros(0, 0)),
            indexed: 0,
            new_count: 0,
            new_count_limit: tuning.rebuild_limit_seed,
            tuning,
            log: SolverLog::new(),
        }
    }

    pub fn set_tuning(&mut self, tuning: SolverTuning) {
        self.tuning = tuning;
    }

    /// Access the wrapped solver.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of operating points stored so far.
    pub fn history_len(&self) -> usize {
        self.ps.len()
    }

    fn rebuild(&mut self) {
        let p_dim = self.ps[0].len();
        let k = self.ps.len();
        let mut data = Vec::with_capacity(p_dim * k);
        for col in &self.ps {
            data.extend(col.iter().copied());
        }
        self.tree = KdTree::build(DMatrix::from_vec(p_dim, k, data));
        self.indexed = k;
        self.new_count = 0;
        self.new_count_limit = 2 * k;
        self.log.record("cache tree rebuilt");
    }
}

fn squared_distance(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    (a - b).norm_squared()
}

impl<S: Solver> Solver for CachingWrapper<S> {
    fn solve(&mut self, p: &DVector<f64>) -> DVector<f64> {
        let origin_p = self.inner.get_origin().0.clone();
        let d0 = squared_distance(p, &origin_p);
        let mut candidate: (f64, Option<usize>) = (d0, None);

        for j in self.indexed..self.ps.len() {
            let d = squared_distance(p, &self.ps[j]);
            if d < candidate.0 {
                candidate = (d, Some(j));
            }
        }

        let (_, best_idx) = self.tree.nearest(p, candidate);

        if let Some(idx) = best_idx {
            self.inner.set_origin(self.ps[idx].clone(), self.zs[idx].clone());
            self.log.record("cache hit, origin replaced");
        }

        let z = self.inner.solve(p);

        if self.inner.has_converged() && self.inner.needed_iterations() > self.tuning.cache_gate_iters {
            self.ps.push(p.clone());
            self.zs.push(z.clone());
            self.new_count += 1;
            self.log.record("stored new operating point");
        }

        if self.new_count > 0 {
            self.new_count_limit = self.new_count_limit.saturating_sub(1);
        }
        if self.new_count > self.new_count_limit {
            self.rebuild();
        }

        z
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
