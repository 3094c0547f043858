//! filtering — the trend-filter formulation engine.
//!
//! Purpose
//! -------
//! Fit a smooth or piecewise-structured curve to noisy, irregularly spaced
//! 1-D samples by building a convex program: a Huber data-fit term with a
//! blended noise scale, L1/L2 penalties on derivative orders 0/1/2 of the
//! base model, optional monotonicity and zero-at-origin structure, and
//! optional independently regularized "seasonal" deviation components. The
//! numeric solve is delegated to the solver collaborator in
//! [`crate::optimization`]; this module owns formulation and packaging
//! only.
//!
//! Key behaviors
//! -------------
//! - The fit variable represents per-step **increments**; the cumulative
//!   matrix is the explicit to-curve transform. Monotonicity is a sign
//!   constraint on this variable, which forces the curve non-decreasing by
//!   construction (see [`core::variables`] and the assembler).
//! - Derivative operators weight differences by the actual x-spacing; the
//!   curvature operator's scale-free rows are invariant under a global
//!   rescaling of x ([`core::operators`]).
//! - Regularization is an ordered, tagged, individually inspectable
//!   collection of [`core::regularization::RegularizationTerm`] values.
//! - Every declared variable carries an explicit handle end-to-end; no
//!   positional inference anywhere in the pipeline.
//!
//! Invariants & assumptions
//! ------------------------
//! - All entities are constructed fresh per [`api::trend_filter`] call;
//!   nothing persists across calls, so concurrent invocations are safe
//!   provided each uses its own solver session.
//! - Validation errors surface before any solver interaction; a solver
//!   failure propagates as
//!   [`errors::FilterError::Solve`] with no stale or zero-filled values.
//!
//! Downstream usage
//! ----------------
//! - Call [`api::trend_filter`] with a validated
//!   [`core::samples::SampleSet`] and [`core::options::FilterOptions`], or
//!   [`api::trend_filter_with`] to supply your own
//!   [`Solver`](crate::optimization::convex::Solver).
//! - Front-ends typically import the curated surface via
//!   `filtering::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each component; the end-to-end properties
//!   (monotonicity, zero-at-origin, scale invariance, idempotence, the
//!   seasonal scenario) are exercised in `tests/`.

pub mod api;
pub mod core;
pub mod errors;
pub mod model;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use trendfilter::filtering::prelude::*;
//
// to import the main filtering surface in a single line.

pub mod prelude {
    pub use super::api::{trend_filter, trend_filter_with};
    pub use super::core::{
        DeviationMapping, FilterOptions, LinearDeviationSpec, NormKind, SampleSet,
    };
    pub use super::errors::{FilterError, FilterResult};
    pub use super::model::{LinearInterpolator, TrendFilterFit};
}
