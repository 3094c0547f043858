//! filtering::core — validated inputs and the formulation building blocks.
//!
//! Purpose
//! -------
//! Hold the leaf components of the formulation engine: the validated
//! sample container, the non-evenly-spaced grid operators, the robust
//! loss, the tagged regularization terms, the linear deviation specs, the
//! variable layout with its explicit handles, and the per-call options.
//! Everything here is constructed fresh per `trend_filter` call and is
//! consumed by the assembler in `filtering::model`.
//!
//! Conventions
//! -----------
//! - Vectors and matrices are `ndarray` containers over `f64`.
//! - Validation happens at construction time; downstream code relies on
//!   the documented invariants and does not re-check.
//! - Degenerate cases (n < 3 curvature operator, empty deviation lists)
//!   silently contribute nothing rather than failing.

pub mod deviations;
pub mod loss;
pub mod operators;
pub mod options;
pub mod regularization;
pub mod samples;
pub mod validation;
pub mod variables;

pub use self::deviations::{DeviationMapping, LinearDeviationSpec};
pub use self::loss::{huber, huber_grad, noise_scale, RobustLoss};
pub use self::operators::{
    cumulative_matrix, first_derivative, first_derivative_matrix, second_derivative_matrix,
};
pub use self::options::FilterOptions;
pub use self::regularization::{
    build_regularization, DerivOrder, LinearOperand, NormKind, RegularizationTerm,
};
pub use self::samples::SampleSet;
pub use self::variables::{VarBlock, VarHandle, VariableLayout};
