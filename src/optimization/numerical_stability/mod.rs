//! numerical_stability — guarded nonlinear transforms for the solver layer.
//!
//! Purpose
//! -------
//! Provide overflow/underflow-safe transforms used when mapping
//! sign-constrained variables into the unconstrained space the backend
//! solver iterates in, plus the derivative needed for the chain rule.
//!
//! Conventions
//! -----------
//! - All transforms are scalar `f64 → f64`; vectorization happens at the
//!   call site (the constrained adapter).
//! - Guard cutoffs are fixed constants chosen for `f64` conditioning; they
//!   are not configurable.

pub mod transformations;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{safe_sigmoid, safe_softplus, safe_softplus_inv};
}
