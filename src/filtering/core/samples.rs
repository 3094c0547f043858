//! Sample containers for trend filtering.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the (x, y, y_err) triples the
//! formulation engine consumes. This module centralizes input validation
//! for raw samples and standardizes the y-error default.
//!
//! Key behaviors
//! -------------
//! - [`SampleSet`] enforces the data invariants (equal lengths, n ≥ 2,
//!   finite values, strictly increasing x, strictly positive y_err).
//! - A missing `y_err` defaults to a unit vector, matching the upstream
//!   convention for unweighted fits.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x.len() == y.len() == y_err.len() >= 2`.
//! - All entries are finite; x is strictly increasing; y_err is strictly
//!   positive.
//! - The container never mutates or rescales its inputs.
//!
//! Downstream usage
//! ----------------
//! - Construct a [`SampleSet`] at the boundary where raw data enters the
//!   engine; everything downstream (operators, loss, assembly) relies on
//!   its invariants and performs no re-validation.
use crate::filtering::{
    core::validation::{validate_finite, validate_strictly_increasing, validate_strictly_positive},
    errors::{FilterError, FilterResult},
};
use ndarray::Array1;

/// `SampleSet` — validated (x, y, y_err) samples for one fit.
///
/// Purpose
/// -------
/// Represent a single, validated set of noisy observations on an
/// irregularly spaced grid, together with per-point uncertainties. This
/// type centralizes the basic input checks so downstream code can assume
/// clean data.
///
/// Fields
/// ------
/// - `x`: `Array1<f64>`
///   Strictly increasing sample locations.
/// - `y`: `Array1<f64>`
///   Observed values; must be finite.
/// - `y_err`: `Array1<f64>`
///   Per-point uncertainty scales; finite and strictly positive. Defaults
///   to ones when not supplied.
///
/// Invariants
/// ----------
/// - All three arrays share the same length `n >= 2`.
/// - `x[i] < x[i+1]` for all i.
/// - `y_err[i] > 0` for all i.
///
/// Performance
/// -----------
/// - Validation is O(n) with a single scan per array; after construction
///   this is a lightweight container with no hidden allocations.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    /// Strictly increasing sample locations.
    pub x: Array1<f64>,
    /// Observed values.
    pub y: Array1<f64>,
    /// Per-point uncertainty scales (> 0).
    pub y_err: Array1<f64>,
}

impl SampleSet {
    /// Construct a validated [`SampleSet`].
    ///
    /// Parameters
    /// ----------
    /// - `x`: sample locations, strictly increasing, finite, length ≥ 2.
    /// - `y`: observed values, finite, same length as `x`.
    /// - `y_err`: optional per-point uncertainties, finite and strictly
    ///   positive, same length as `x`. `None` defaults to a unit vector.
    ///
    /// Returns
    /// -------
    /// `FilterResult<SampleSet>`
    ///   - `Ok(SampleSet)` if all invariants are satisfied.
    ///   - `Err(FilterError)` if validation fails.
    ///
    /// Errors
    /// ------
    /// - `FilterError::XYLengthMismatch` when `x` and `y` differ in length.
    /// - `FilterError::TooFewSamples` when fewer than 2 samples are given.
    /// - `FilterError::YErrLengthMismatch` when a supplied `y_err` differs
    ///   in length.
    /// - `FilterError::NonFiniteSample` for NaN/±∞ entries (first offender).
    /// - `FilterError::NonIncreasingX` when x is not strictly increasing.
    /// - `FilterError::NonPositiveYErr` for y_err entries ≤ 0.
    pub fn new(
        x: Array1<f64>, y: Array1<f64>, y_err: Option<Array1<f64>>,
    ) -> FilterResult<Self> {
        let n = x.len();
        if y.len() != n {
            return Err(FilterError::XYLengthMismatch { x_len: n, y_len: y.len() });
        }
        if n < 2 {
            return Err(FilterError::TooFewSamples { n });
        }
        let y_err = match y_err {
            Some(e) => {
                if e.len() != n {
                    return Err(FilterError::YErrLengthMismatch { expected: n, actual: e.len() });
                }
                e
            }
            None => Array1::ones(n),
        };
        validate_finite("x", &x)?;
        validate_finite("y", &y)?;
        validate_finite("y_err", &y_err)?;
        validate_strictly_increasing(&x)?;
        validate_strictly_positive(&y_err)?;
        Ok(Self { x, y, y_err })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false for a constructed set (n ≥ 2), provided for idiom.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover construction behavior for `SampleSet::new`: the
    // happy path with and without y_err, the default unit y_err, and each
    // rejection branch.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the happy path and the unit default for y_err.
    //
    // Given
    // -----
    // - Valid x/y with no y_err supplied.
    //
    // Expect
    // ------
    // - Construction succeeds and y_err is a unit vector.
    fn defaults_y_err_to_ones() {
        // Arrange
        let x = array![0.0, 1.0, 2.5];
        let y = array![1.0, -0.5, 3.0];

        // Act
        let samples = SampleSet::new(x, y, None).expect("valid samples should construct");

        // Assert
        assert_eq!(samples.len(), 3);
        assert_eq!(samples.y_err, array![1.0, 1.0, 1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure every validation branch rejects its malformed input.
    //
    // Given
    // -----
    // - Length mismatches, a single sample, a NaN y, a tied x, a zero
    //   y_err.
    //
    // Expect
    // ------
    // - The matching `FilterError` variant for each case.
    fn rejects_malformed_inputs() {
        // Arrange & Act & Assert
        assert!(matches!(
            SampleSet::new(array![0.0, 1.0], array![1.0], None),
            Err(FilterError::XYLengthMismatch { x_len: 2, y_len: 1 })
        ));
        assert!(matches!(
            SampleSet::new(array![0.0], array![1.0], None),
            Err(FilterError::TooFewSamples { n: 1 })
        ));
        assert!(matches!(
            SampleSet::new(array![0.0, 1.0], array![1.0, 2.0], Some(array![1.0])),
            Err(FilterError::YErrLengthMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            SampleSet::new(array![0.0, 1.0], array![1.0, f64::NAN], None),
            Err(FilterError::NonFiniteSample { name: "y", index: 1, .. })
        ));
        assert!(matches!(
            SampleSet::new(array![0.0, 0.0], array![1.0, 2.0], None),
            Err(FilterError::NonIncreasingX { index: 0, .. })
        ));
        assert!(matches!(
            SampleSet::new(array![0.0, 1.0], array![1.0, 2.0], Some(array![1.0, 0.0])),
            Err(FilterError::NonPositiveYErr { index: 1, .. })
        ));
    }
}
