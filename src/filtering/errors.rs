//! Errors for trend-filter formulation (sample validation, option checks,
//! operator dimension contracts, deviation configuration, and solver
//! failures).
//!
//! This module defines the formulation error type, [`FilterError`], used
//! across the public API and the internal core. It implements
//! `Display`/`Error` and converts to `PyErr` for PyO3 when the
//! `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - x-values must be **finite and strictly increasing**; y-errors must be
//!   **finite and strictly positive**.
//! - Everything in this taxonomy except [`FilterError::Solve`] is raised
//!   before any solver interaction and is never retried.
//! - Solver/backend failures are carried verbatim inside
//!   [`FilterError::Solve`] with whatever diagnostic the collaborator
//!   provides; no automatic retry or constraint relaxation happens here.
use crate::optimization::errors::SolverError;

#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::PyErr;

/// Crate-wide result alias for formulation operations that may produce
/// [`FilterError`].
pub type FilterResult<T> = Result<T, FilterError>;

/// Unified error type for trend-filter formulation.
///
/// Covers input/data validation, configuration checks, operator dimension
/// contracts, linear-deviation configuration, and solver failures.
/// Implements `Display`/`Error` and converts to a Python `ValueError` at
/// PyO3 boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    // ---- Sample validation ----
    /// x and y lengths differ.
    XYLengthMismatch { x_len: usize, y_len: usize },

    /// y_err length differs from x/y.
    YErrLengthMismatch { expected: usize, actual: usize },

    /// At least two samples are required.
    TooFewSamples { n: usize },

    /// A sample value is NaN/±inf.
    NonFiniteSample { name: &'static str, index: usize, value: f64 },

    /// x must be strictly increasing.
    NonIncreasingX { index: usize, prev: f64, next: f64 },

    /// y_err entries must be strictly positive.
    NonPositiveYErr { index: usize, value: f64 },

    // ---- Options validation ----
    /// l_norm must be 1 or 2.
    InvalidNorm { l_norm: u32 },

    /// Regularization weights must be finite and non-negative.
    InvalidAlpha { name: &'static str, value: f64 },

    // ---- Grid operators ----
    /// Operator target length does not match the grid length.
    OperatorDimMismatch { expected: usize, found: usize },

    // ---- Linear deviations ----
    /// A deviation must declare at least one category.
    EmptyDeviation { name: String },

    /// A deviation's regularization weight must be finite and non-negative.
    InvalidDeviationAlpha { name: String, value: f64 },

    /// A per-sample mapping table must cover every sample.
    DeviationMappingLength { name: String, expected: usize, actual: usize },

    /// A mapping produced a category index outside the declared codomain.
    DeviationCategoryOutOfRange { name: String, index: usize, category: usize, n_vars: usize },

    /// A soft-assignment weight matrix has the wrong shape.
    DeviationWeightsShape {
        name: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// A soft-assignment weight must be finite.
    NonFiniteDeviationWeight { name: String, row: usize, col: usize, value: f64 },

    // ---- Solver ----
    /// The solver collaborator reported a failure; no values are returned.
    Solve(SolverError),
}

impl std::error::Error for FilterError {}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Sample validation ----
            FilterError::XYLengthMismatch { x_len, y_len } => {
                write!(f, "x and y length mismatch: x has {x_len}, y has {y_len}")
            }
            FilterError::YErrLengthMismatch { expected, actual } => {
                write!(f, "y_err length mismatch: expected {expected}, actual {actual}")
            }
            FilterError::TooFewSamples { n } => {
                write!(f, "At least 2 samples are required, got {n}")
            }
            FilterError::NonFiniteSample { name, index, value } => {
                write!(f, "Non-finite {name} at index {index}: {value}")
            }
            FilterError::NonIncreasingX { index, prev, next } => {
                write!(
                    f,
                    "x must be strictly increasing: x[{}] = {prev} >= x[{}] = {next}",
                    index,
                    index + 1
                )
            }
            FilterError::NonPositiveYErr { index, value } => {
                write!(f, "y_err must be strictly positive: y_err[{index}] = {value}")
            }

            // ---- Options validation ----
            FilterError::InvalidNorm { l_norm } => {
                write!(f, "Invalid l_norm {l_norm}: must be 1 (L1) or 2 (L2)")
            }
            FilterError::InvalidAlpha { name, value } => {
                write!(f, "Invalid {name} = {value}: must be finite and non-negative")
            }

            // ---- Grid operators ----
            FilterError::OperatorDimMismatch { expected, found } => {
                write!(f, "Operator dimension mismatch: grid has {expected}, target has {found}")
            }

            // ---- Linear deviations ----
            FilterError::EmptyDeviation { name } => {
                write!(f, "Linear deviation '{name}' must declare at least one category")
            }
            FilterError::InvalidDeviationAlpha { name, value } => {
                write!(
                    f,
                    "Linear deviation '{name}' has invalid alpha {value}: must be finite and \
                     non-negative"
                )
            }
            FilterError::DeviationMappingLength { name, expected, actual } => {
                write!(
                    f,
                    "Linear deviation '{name}' mapping covers {actual} samples, expected {expected}"
                )
            }
            FilterError::DeviationCategoryOutOfRange { name, index, category, n_vars } => {
                write!(
                    f,
                    "Linear deviation '{name}' mapped sample {index} to category {category}, \
                     outside the declared {n_vars} categories"
                )
            }
            FilterError::DeviationWeightsShape { name, expected, found } => {
                write!(
                    f,
                    "Linear deviation '{name}' weight matrix has shape {found:?}, expected \
                     {expected:?}"
                )
            }
            FilterError::NonFiniteDeviationWeight { name, row, col, value } => {
                write!(
                    f,
                    "Linear deviation '{name}' has non-finite weight at ({row}, {col}): {value}"
                )
            }

            // ---- Solver ----
            FilterError::Solve(err) => {
                write!(f, "Solver failure: {err}")
            }
        }
    }
}

impl From<SolverError> for FilterError {
    fn from(err: SolverError) -> Self {
        FilterError::Solve(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<FilterError> for PyErr {
    fn from(err: FilterError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}
