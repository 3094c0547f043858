//! optimization — solver-collaborator stack, numerical helpers, and the
//! solver error surface.
//!
//! Purpose
//! -------
//! Provide the backend layer the trend-filter formulation engine delegates
//! to: an Argmin-backed constrained convex minimizer behind an explicit
//! [`Solver`](convex::Solver) capability, numerically stable transforms for
//! sign-constrained variables, and a single error/result surface. The
//! formulation engine builds an objective and constraint set and obtains
//! solved variable values and diagnostics without touching backend solver
//! details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing convex objectives** under
//!   non-negativity and linear-equality constraints (`convex`).
//! - Supply shared numerical primitives (`numerical_stability`) for mapping
//!   constrained variables into an unconstrained solver space.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::SolverError`) with a common result
//!   alias (`SolveResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - The backend operates in an unconstrained space; any mapping between
//!   constrained model variables and solver variables happens inside the
//!   collaborator, never in the formulation engine.
//! - Objective implementations treat domain violations as recoverable
//!   errors surfaced through `SolverError`, not panics.
//! - This module and its submodules avoid I/O and logging; the optional
//!   `obs_slog` observer is the only exception and is feature-gated.
//!
//! Downstream usage
//! ----------------
//! - The filtering module implements `ConvexObjective` for its assembled
//!   program and hands it to a `Solver` (the default [`convex::LbfgsSolver`]
//!   or a caller-supplied stub).
//! - Front-ends import the curated surface via `optimization::prelude::*`.

pub mod convex;
pub mod errors;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use trendfilter::optimization::prelude::*;
//
// to import the main solver surface in a single line.

pub mod prelude {
    pub use super::convex::prelude::*;
    pub use super::errors::{SolveResult, SolverError};
    pub use super::numerical_stability::prelude::*;
}
