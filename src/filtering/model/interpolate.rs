//! Linear interpolation over the fitted curve.
//!
//! Purpose
//! -------
//! Provide the post-hoc evaluation function packaged with every fit: a
//! simple wrapper over the discrete solution that interpolates linearly
//! between sample locations and extrapolates beyond the sample range using
//! the boundary segment's linear trend (the behavior of
//! `interp1d(..., fill_value="extrapolate")` upstream).
//!
//! Invariants & assumptions
//! ------------------------
//! - `x` is strictly increasing with length ≥ 2 and `y` matches it; both
//!   come from an already-validated fit, so no re-validation happens here.
use ndarray::Array1;

/// `LinearInterpolator` — piecewise-linear evaluation of a fitted curve.
///
/// Inside `[x[0], x[n-1]]` values are interpolated on the enclosing
/// segment; outside, the first/last segment's line is extended.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl LinearInterpolator {
    /// Wrap a solved curve. Callers guarantee the `SampleSet` invariants
    /// (strictly increasing x, matching lengths, n ≥ 2).
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        debug_assert!(x.len() >= 2);
        Self { x, y }
    }

    /// Evaluate the curve at an arbitrary location.
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        // Index of the segment [x[i], x[i+1]] used for (extra)polation.
        let i = match self.x.iter().position(|&xi| xi > t) {
            Some(0) => 0,
            Some(p) => p - 1,
            None => n - 2,
        };
        let i = i.min(n - 2);
        let slope = (self.y[i + 1] - self.y[i]) / (self.x[i + 1] - self.x[i]);
        self.y[i] + slope * (t - self.x[i])
    }

    /// Evaluate the curve at many locations.
    pub fn eval_many(&self, ts: &Array1<f64>) -> Array1<f64> {
        ts.mapv(|t| self.eval(t))
    }

    /// The sample locations the interpolator was built on.
    pub fn knots(&self) -> &Array1<f64> {
        &self.x
    }

    /// The fitted values at the sample locations.
    pub fn values(&self) -> &Array1<f64> {
        &self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover exact reproduction at the knots, interior
    // interpolation on an irregular grid, and boundary-trend extrapolation
    // on both sides.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify knots are reproduced exactly and interior points follow the
    // enclosing segment.
    //
    // Given
    // -----
    // - An irregular grid (0, 1, 3) with values (0, 2, 4).
    //
    // Expect
    // ------
    // - f(knot) = value; f(2) = 3 on the second segment.
    fn interpolates_on_segments() {
        // Arrange
        let f = LinearInterpolator::new(array![0.0, 1.0, 3.0], array![0.0, 2.0, 4.0]);

        // Act & Assert
        assert_relative_eq!(f.eval(0.0), 0.0, epsilon = 1e-14);
        assert_relative_eq!(f.eval(1.0), 2.0, epsilon = 1e-14);
        assert_relative_eq!(f.eval(3.0), 4.0, epsilon = 1e-14);
        assert_relative_eq!(f.eval(2.0), 3.0, epsilon = 1e-14);
        assert_relative_eq!(f.eval(0.5), 1.0, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Verify extrapolation extends the boundary segments' lines.
    //
    // Given
    // -----
    // - The same grid: first segment slope 2, last segment slope 1.
    //
    // Expect
    // ------
    // - f(−1) = −2 (first trend); f(5) = 6 (last trend).
    fn extrapolates_boundary_trends() {
        // Arrange
        let f = LinearInterpolator::new(array![0.0, 1.0, 3.0], array![0.0, 2.0, 4.0]);

        // Act
        let left = f.eval(-1.0);
        let right = f.eval(5.0);
        let many = f.eval_many(&array![-1.0, 5.0]);

        // Assert
        assert_relative_eq!(left, -2.0, epsilon = 1e-14);
        assert_relative_eq!(right, 6.0, epsilon = 1e-14);
        assert_eq!(many, array![left, right]);
    }
}
