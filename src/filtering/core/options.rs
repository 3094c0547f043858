//! Filter options — configuration for one trend-filter call.
//!
//! Purpose
//! -------
//! Collect the configuration knobs for a single formulation-and-solve call
//! in one validated place: the three derivative-penalty weights, the norm
//! choice, the structural flags (zero-at-origin, monotonicity), the linear
//! deviation specs, and the nested solver options.
//!
//! Key behaviors
//! -------------
//! - [`FilterOptions::new`] validates the alphas on construction; the norm
//!   arrives as an already-resolved [`NormKind`] (use
//!   [`NormKind::from_l_norm`] to map the upstream 1/2 integer switch).
//! - `Default` matches the upstream call signature's defaults: all alphas
//!   zero, L2 norm, no constraints, no deviations, default solver options.
//!
//! Invariants & assumptions
//! ------------------------
//! - Alphas are finite and non-negative; zero disables a term without
//!   removing it from the inspectable collection.
//! - Deviation specs have been validated by their own constructor
//!   ([`LinearDeviationSpec::new`]); no cross-field checks happen here.
//! - Monotonicity is a property of the increment variable's sign, not a
//!   separate constraint; the assembler reads the flag when declaring the
//!   variable.
use crate::filtering::{
    core::{deviations::LinearDeviationSpec, regularization::NormKind, validation::validate_alpha},
    errors::FilterResult,
};
use crate::optimization::convex::SolverOptions;

/// `FilterOptions` — validated per-call configuration.
///
/// Fields
/// ------
/// - `alpha_0`, `alpha_1`, `alpha_2`: weights on the order-0/1/2
///   derivative penalties over the base model.
/// - `norm`: L1 (piecewise-structured/robust) or L2 (smooth).
/// - `constrain_zero`: force the full model's first point to 0.
/// - `monotonic`: constrain the increment variable non-negative, making
///   the curve non-decreasing by construction.
/// - `linear_deviations`: exogenous categorical components, processed in
///   the order given.
/// - `solver`: backend configuration handed to the default collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub alpha_0: f64,
    pub alpha_1: f64,
    pub alpha_2: f64,
    pub norm: NormKind,
    pub constrain_zero: bool,
    pub monotonic: bool,
    pub linear_deviations: Vec<LinearDeviationSpec>,
    pub solver: SolverOptions,
}

impl FilterOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidAlpha`](crate::filtering::errors::FilterError::InvalidAlpha)
    /// when any weight is NaN/±∞ or negative.
    pub fn new(
        alpha_0: f64, alpha_1: f64, alpha_2: f64, norm: NormKind, constrain_zero: bool,
        monotonic: bool, linear_deviations: Vec<LinearDeviationSpec>, solver: SolverOptions,
    ) -> FilterResult<Self> {
        validate_alpha("alpha_0", alpha_0)?;
        validate_alpha("alpha_1", alpha_1)?;
        validate_alpha("alpha_2", alpha_2)?;
        Ok(Self {
            alpha_0,
            alpha_1,
            alpha_2,
            norm,
            constrain_zero,
            monotonic,
            linear_deviations,
            solver,
        })
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            alpha_0: 0.0,
            alpha_1: 0.0,
            alpha_2: 0.0,
            norm: NormKind::L2,
            constrain_zero: false,
            monotonic: false,
            linear_deviations: Vec::new(),
            solver: SolverOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::errors::FilterError;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the default configuration and alpha validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the defaults to the upstream call signature.
    //
    // Given
    // -----
    // - `FilterOptions::default()`.
    //
    // Expect
    // ------
    // - Zero alphas, L2 norm, both flags off, no deviations.
    fn defaults_match_upstream_signature() {
        // Arrange & Act
        let opts = FilterOptions::default();

        // Assert
        assert_eq!(opts.alpha_0, 0.0);
        assert_eq!(opts.alpha_1, 0.0);
        assert_eq!(opts.alpha_2, 0.0);
        assert_eq!(opts.norm, NormKind::L2);
        assert!(!opts.constrain_zero);
        assert!(!opts.monotonic);
        assert!(opts.linear_deviations.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Verify alpha validation names the offending weight.
    //
    // Given
    // -----
    // - A negative alpha_1.
    //
    // Expect
    // ------
    // - `InvalidAlpha { name: "alpha_1", .. }`.
    fn rejects_negative_alpha() {
        // Arrange & Act
        let result = FilterOptions::new(
            0.0,
            -0.5,
            0.0,
            NormKind::L2,
            false,
            false,
            Vec::new(),
            SolverOptions::default(),
        );

        // Assert
        assert!(matches!(result, Err(FilterError::InvalidAlpha { name: "alpha_1", .. })));
    }
}
