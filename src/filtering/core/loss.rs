//! Robust data-fidelity loss.
//!
//! Purpose
//! -------
//! Build the Huber data-fit term: a per-point inverse noise scale that
//! blends the supplied uncertainties with a data-driven floor, and a loss
//! that is quadratic near zero and linear in the tails so outliers cannot
//! dominate the fit.
//!
//! Key behaviors
//! -------------
//! - [`noise_scale`] computes `isig[i] = 1 / sqrt(buff² + y_err[i]²)` with
//!   `buff = 0.01 · median(|y|)`. The floor keeps near-zero uncertainties
//!   from making the loss arbitrarily sharp and keeps the scaling sensible
//!   when y spans several orders of magnitude.
//! - [`huber`] / [`huber_grad`] implement the unit-transition Huber loss
//!   `u²/2` for |u| ≤ 1, `|u| − 1/2` otherwise, and its derivative (u
//!   clamped to \[−1, 1\]).
//! - [`RobustLoss`] evaluates `Σ huber(isig[i] · (model[i] − y[i]))` and
//!   its gradient with respect to the model vector.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs come from a validated `SampleSet`: finite y, strictly positive
//!   y_err. `isig` is therefore finite and strictly positive.
//! - The loss applies to the **full** model (base plus any deviation
//!   contributions), not to the base model alone.
use ndarray::Array1;
use statrs::statistics::{Data, Median};

/// Huber loss with unit transition: `u²/2` for |u| ≤ 1, `|u| − 1/2`
/// otherwise. Convex, C¹, and linear in the tails.
pub fn huber(u: f64) -> f64 {
    let a = u.abs();
    if a <= 1.0 { 0.5 * u * u } else { a - 0.5 }
}

/// Derivative of [`huber`]: `u` clamped to `[-1, 1]`.
pub fn huber_grad(u: f64) -> f64 {
    u.clamp(-1.0, 1.0)
}

/// Per-point inverse noise scale blending `y_err` with a data-driven floor.
///
/// `buff = 0.01 · median(|y|)`; `isig[i] = 1 / sqrt(buff² + y_err[i]²)`.
/// With the default unit `y_err` the floor is negligible; it matters when
/// callers pass very small uncertainties.
pub fn noise_scale(y: &Array1<f64>, y_err: &Array1<f64>) -> Array1<f64> {
    let abs_y: Vec<f64> = y.iter().map(|v| v.abs()).collect();
    let buff = 0.01 * Data::new(abs_y).median();
    let buff_2 = buff * buff;
    y_err.mapv(|e| 1.0 / (buff_2 + e * e).sqrt())
}

/// `RobustLoss` — the assembled Huber data-fit term for one problem.
///
/// Holds the observations and the blended inverse scales; evaluates the
/// scalar loss and its gradient with respect to the model vector. The
/// assembler chains that gradient through the model's linear pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct RobustLoss {
    /// Observed values.
    pub y: Array1<f64>,
    /// Blended inverse noise scales (strictly positive).
    pub isig: Array1<f64>,
}

impl RobustLoss {
    /// Build the loss from validated samples.
    pub fn new(y: Array1<f64>, y_err: &Array1<f64>) -> Self {
        let isig = noise_scale(&y, y_err);
        Self { y, isig }
    }

    /// Number of data points.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Always false for a constructed loss (n ≥ 2), provided for idiom.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Evaluate `Σ huber(isig[i] · (model[i] − y[i]))`.
    pub fn value(&self, model: &Array1<f64>) -> f64 {
        self.y
            .iter()
            .zip(self.isig.iter())
            .zip(model.iter())
            .map(|((&yi, &si), &mi)| huber(si * (mi - yi)))
            .sum()
    }

    /// Gradient of [`Self::value`] with respect to the model vector:
    /// `isig[i] · huber'(isig[i] · (model[i] − y[i]))`.
    pub fn grad_wrt_model(&self, model: &Array1<f64>) -> Array1<f64> {
        let mut g = Array1::zeros(model.len());
        for i in 0..model.len() {
            let u = self.isig[i] * (model[i] - self.y[i]);
            g[i] = self.isig[i] * huber_grad(u);
        }
        g
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
    // These tests cover:
    // - The Huber value/derivative on both branches and at the transition.
    // - The blended noise scale against a hand computation.
    // - RobustLoss value/gradient consistency (gradient vs finite
    //   difference).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the Huber branches: quadratic inside the unit band, linear
    // outside, continuous at the transition.
    //
    // Given
    // -----
    // - Residuals 0, ±0.5, ±1, ±3.
    //
    // Expect
    // ------
    // - u²/2 inside, |u| − 1/2 outside, equal at |u| = 1; derivative
    //   clamps at ±1.
    fn huber_branches_and_transition() {
        // Arrange & Act & Assert
        assert_eq!(huber(0.0), 0.0);
        assert_relative_eq!(huber(0.5), 0.125, epsilon = 1e-15);
        assert_relative_eq!(huber(-0.5), 0.125, epsilon = 1e-15);
        assert_relative_eq!(huber(1.0), 0.5, epsilon = 1e-15);
        assert_relative_eq!(huber(3.0), 2.5, epsilon = 1e-15);
        assert_relative_eq!(huber(-3.0), 2.5, epsilon = 1e-15);
        assert_eq!(huber_grad(0.25), 0.25);
        assert_eq!(huber_grad(5.0), 1.0);
        assert_eq!(huber_grad(-5.0), -1.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the noise floor blend against a hand computation.
    //
    // Given
    // -----
    // - y with median(|y|) = 2 and y_err = (1, 0.001).
    //
    // Expect
    // ------
    // - buff = 0.02; isig[i] = 1/sqrt(0.0004 + y_err²). The tiny y_err is
    //   floored instead of blowing up the scale.
    fn noise_scale_blends_floor_and_y_err() {
        // Arrange
        let y = array![-2.0, 2.0];
        let y_err = array![1.0, 0.001];

        // Act
        let isig = noise_scale(&y, &y_err);

        // Assert
        assert_relative_eq!(isig[0], 1.0 / (0.0004_f64 + 1.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(
            isig[1],
            1.0 / (0.0004_f64 + 1e-6).sqrt(),
            epsilon = 1e-12
        );
        assert!(isig[1] < 1.0 / 0.001, "floor must cap the inverse scale");
    }

    #[test]
    // Purpose
    // -------
    // Check the analytic loss gradient against central differences across
    // both Huber branches.
    //
    // Given
    // -----
    // - A loss over three points and a model with small and large
    //   residuals.
    //
    // Expect
    // ------
    // - Gradient entries within 1e-6 of the finite difference.
    fn loss_gradient_matches_finite_difference() {
        // Arrange
        let y = array![1.0, -2.0, 0.5];
        let y_err = array![1.0, 0.5, 2.0];
        let loss = RobustLoss::new(y, &y_err);
        let model = array![1.2, 3.0, 0.4];

        // Act
        let g = loss.grad_wrt_model(&model);
        let h = 1e-7;
        for i in 0..3 {
            let mut up = model.clone();
            let mut dn = model.clone();
            up[i] += h;
            dn[i] -= h;
            let fd = (loss.value(&up) - loss.value(&dn)) / (2.0 * h);

            // Assert
            assert_relative_eq!(g[i], fd, epsilon = 1e-6);
        }
    }
}
