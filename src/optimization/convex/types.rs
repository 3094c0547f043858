//! convex::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the convex
//! minimization layer. By defining these in one place, the rest of the
//! solver code can stay agnostic to `ndarray` and Argmin generics and can
//! more easily evolve if the backend changes.
//!
//! Conventions
//! -----------
//! - All solver vectors are `ndarray` containers over `f64`.
//! - [`Theta`] is the stacked variable vector of a convex program (increment
//!   block first, then one block per linear deviation); [`Grad`] matches its
//!   shape.
//! - [`Cost`] is a scalar objective value in minimization space; there is no
//!   sign flip anywhere in this crate.
//! - The line-search aliases assume Argmin's three-parameter forms
//!   `(Param, Gradient, Float)` as of the pinned Argmin version.

use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Stacked variable vector of a convex program.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical variable type
/// throughout the solver layer.
pub type Theta = Array1<f64>;

/// Gradient vector matching the shape of [`Theta`].
pub type Grad = Array1<f64>;

/// Scalar objective value to be minimized.
pub type Cost = f64;

/// Function-evaluation counters as reported by the backend solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
