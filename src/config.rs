//! Tuning knobs for the solver stack
//!
//! A handful of heuristic constants are part of the solver contract (the
//! caching gate, the rebuild doubling policy, the default tolerance and
//! iteration budget) because specific test scenarios depend on their
//! exact values, even though they remain heuristics without formal
//! justification. [`SolverTuning`] bundles
//! them as a plain struct of resolution knobs with a `Default` impl and a
//! `Display` for debugging.
use std::fmt;

/// Tunable constants shared by the base, homotopy and caching solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverTuning {
    /// Convergence threshold on `||r||^2`. Default `1e-20`.
    pub tolerance: f64,
    /// Maximum Newton iterations per attempt. Default `500`.
    pub maxiter: usize,
    /// Caching wrapper: an attempt is stored only if it converged in
    /// strictly more than this many iterations. Default `5`.
    pub cache_gate_iters: usize,
    /// Caching wrapper: initial value of `new_count_limit`. Default `2`.
    pub rebuild_limit_seed: usize,
    /// Homotopy wrapper: maximum number of bisection attempts before
    /// giving up, resolving the open question of the source's
    /// "`a` becomes numerically zero" termination criterion. Default
    /// `64`.
    pub max_bisections: usize,
}

impl Default for SolverTuning {
    fn default() -> Self {
        SolverTuning {
            tolerance: 1e-20,
            maxiter: 500,
            cache_gate_iters: 5,
            rebuild_limit_seed: 2,
            max_bisections: 64,
        }
    }
}

impl fmt::Display for SolverTuning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Solver tuning")?;
        writeln!(f, "=============")?;
        writeln!(f, "  tolerance:          {}", self.tolerance)?;
        writeln!(f, "  maxiter:            {}", self.maxiter)?;
        writeln!(f, "  cache_gate_iters:   {}", self.cache_gate_iters)?;
        writeln!(f, "  rebuild_limit_seed: {}", self.rebuild_limit_seed)?;
        writeln!(f, "  max_bisections:     {}", self.max_bisections)
    }
}
