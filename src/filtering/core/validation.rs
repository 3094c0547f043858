//! Validation helpers for trend-filter inputs.
//!
//! This module centralizes common consistency checks used across the
//! formulation core:
//!
//! - **Array scans**: [`validate_finite`] rejects NaN/±∞ entries;
//!   [`validate_strictly_increasing`] enforces the grid ordering invariant;
//!   [`validate_strictly_positive`] guards y-error scales.
//! - **Weight checks**: [`validate_alpha`] ensures regularization weights
//!   are finite and non-negative.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`FilterError`] variants, making higher-level code more uniform and
//! easier to debug.
use crate::filtering::errors::{FilterError, FilterResult};
use ndarray::Array1;

/// Validate that every entry of `values` is finite.
///
/// `name` identifies the offending array in the error ("x", "y", "y_err").
///
/// # Errors
/// Returns [`FilterError::NonFiniteSample`] with the index and value of the
/// first offending element.
pub fn validate_finite(name: &'static str, values: &Array1<f64>) -> FilterResult<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(FilterError::NonFiniteSample { name, index, value });
        }
    }
    Ok(())
}

/// Validate that `values` is strictly increasing.
///
/// # Errors
/// Returns [`FilterError::NonIncreasingX`] at the first index where
/// `values[i+1] <= values[i]`.
pub fn validate_strictly_increasing(values: &Array1<f64>) -> FilterResult<()> {
    for index in 0..values.len().saturating_sub(1) {
        let prev = values[index];
        let next = values[index + 1];
        if next <= prev {
            return Err(FilterError::NonIncreasingX { index, prev, next });
        }
    }
    Ok(())
}

/// Validate that every entry of `values` is strictly positive.
///
/// # Errors
/// Returns [`FilterError::NonPositiveYErr`] with the index and value of the
/// first offending element.
pub fn validate_strictly_positive(values: &Array1<f64>) -> FilterResult<()> {
    for (index, &value) in values.iter().enumerate() {
        if value <= 0.0 {
            return Err(FilterError::NonPositiveYErr { index, value });
        }
    }
    Ok(())
}

/// Validate a regularization weight.
///
/// Weights must be finite and non-negative; zero disables the term without
/// being an error.
///
/// # Errors
/// Returns [`FilterError::InvalidAlpha`] for NaN/±∞ or negative values.
pub fn validate_alpha(name: &'static str, value: f64) -> FilterResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FilterError::InvalidAlpha { name, value });
    }
    Ok(())
}
