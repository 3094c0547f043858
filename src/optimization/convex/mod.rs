//! convex — argmin-powered constrained convex minimization.
//!
//! Purpose
//! -------
//! Provide the solver-collaborator layer consumed by the trend-filter
//! formulation engine. The engine assembles an objective and a constraint
//! set; this module owns everything backend-specific: the [`Solver`] trait
//! contract, the default argmin L-BFGS implementation, the adapter that
//! maps constrained variables into an unconstrained solver space, and the
//! normalized [`SolveOutcome`].
//!
//! Key behaviors
//! -------------
//! - Expose the collaborator contract ([`Solver`]): objective plus
//!   constraints in, variable values plus achieved objective out, or a
//!   [`SolverError`](crate::optimization::errors::SolverError) — never
//!   stale or partial values.
//! - Adapt a [`ConvexObjective`] to Argmin via [`adapter::ConstrainedAdapter`]:
//!   softplus transform for non-negative variables, quadratic penalty for
//!   linear equalities, finite-difference fallback when no analytic
//!   gradient is available.
//! - Build and run L-BFGS with a configurable line search
//!   ([`builders`], [`run`]), normalizing results via [`api::minimize`].
//! - Centralize configuration ([`Tolerances`], [`SolverOptions`]) and
//!   validation ([`validation`]) so downstream code can assume sane,
//!   finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective is **minimized** directly; there is no sign flip
//!   anywhere in this layer.
//! - [`ConvexObjective::value`] and [`ConvexObjective::grad`] must treat
//!   invalid inputs as recoverable errors, not panics.
//! - Solutions returned to callers are always in model space; the
//!   solver-space transform never leaks across this module's boundary.
//! - Configuration types are validated on construction and treated as
//!   internally consistent by the runner.
//!
//! Downstream usage
//! ----------------
//! - The formulation engine implements [`ConvexObjective`] for its
//!   assembled program and calls [`Solver::solve`] through whichever
//!   collaborator the caller supplies ([`LbfgsSolver`] by default).
//! - Tests substitute stub `Solver` implementations to exercise assembly
//!   and packaging without a numeric backend.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover the adapter's transform/penalty/FD
//!   branches, solver construction, tolerance wiring, and validation.
//! - `api` carries end-to-end minimization tests on smooth bowls covering
//!   the unconstrained, non-negative, and equality-constrained paths.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{minimize, LbfgsSolver};
pub use self::traits::{
    ConstraintSet, ConvexObjective, LinearConstraint, LineSearcher, SolveOutcome, Solver,
    SolverOptions, Tolerances,
};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use trendfilter::optimization::convex::prelude::*;
//
// to import the main solver surface in a single line.

pub mod prelude {
    pub use super::api::{minimize, LbfgsSolver};
    pub use super::traits::{
        ConstraintSet, ConvexObjective, LinearConstraint, SolveOutcome, Solver, SolverOptions,
        Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
