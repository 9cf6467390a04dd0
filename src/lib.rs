//! Homotopy-continued, cached Newton solving
//! ========================================================
//!
//! This crate solves parameter-dependent nonlinear systems F(p, z) = 0,
//! where `p` is a parameter vector and `z` is the unknown.
//!
//! It is built for the case where the solver is invoked repeatedly with a
//! slowly varying `p` (the typical use case is one solve per audio sample
//! in a discrete-time circuit simulation): the engineering problem is not
//! a single Newton iteration, but the strategies that keep repeated
//! solves robust and fast when a good initial guess is critical for
//! convergence.
//!
//! # Layers
//!
//! Three solvers implement the same [`solver::Solver`] contract and
//! compose in any order:
//!
//! 1. [`solver::BaseSolver`] — damped-free Newton iteration with
//!    first-order extrapolation of the initial guess from a remembered
//!    operating point.
//! 2. [`solver::HomotopyWrapper`] — retries a failed solve by walking
//!    `p` along a straight line from the last known-good point,
//!    bisecting the step.
//! 3. [`solver::CachingWrapper`] — maintains a growing set of previously
//!    solved `(p, z)` pairs indexed by a [`kdtree::KdTree`] and seeds the
//!    inner solver with the `z` of the nearest stored `p`.
//!
//! # Example
//!
//! ```
//! use homotopy_rootfinder::oracle::FnOracle;
//! use homotopy_rootfinder::solver::{BaseSolver, Solver};
//! use nalgebra::{DMatrix, DVector};
//!
//! // F(p, z) = 2*z - p
//! let oracle = FnOracle::new(1, 1, |p: &DVector<f64>, z: &DVector<f64>| {
//!     let r = DVector::from_vec(vec![2.0 * z[0] - p[0]]);
//!     let j = DMatrix::from_vec(1, 1, vec![2.0]);
//!     let jp = DMatrix::from_vec(1, 1, vec![-1.0]);
//!     (r, j, jp)
//! });
//!
//! let mut solver = BaseSolver::new(oracle, DVector::from_vec(vec![0.0]), DVector::from_vec(vec![0.0]));
//! let z = solver.solve(&DVector::from_vec(vec![4.0]));
//! assert!(solver.has_converged());
//! assert!((z[0] - 2.0).abs() < 1e-9);
//! ```

pub mod config;
pub mod failure;
pub mod kdtree;
pub mod linalg;
pub mod log;
pub mod oracle;
pub mod solver;
