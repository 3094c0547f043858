//! Result packaging — from a solved program to a caller-facing fit.
//!
//! Purpose
//! -------
//! Turn a [`SolveOutcome`] and its [`TrendFilterProblem`] into the
//! [`TrendFilterFit`] callers consume: the fitted curve and its analytic
//! pieces, per-term regularization values, the objective decomposition,
//! the applied constraint labels, solver diagnostics, and interpolation
//! functions for out-of-sample evaluation. Packaging is pure assembly of
//! already-solved quantities; nothing here re-solves or mutates the
//! program.
//!
//! Invariants & assumptions
//! ------------------------
//! - `objective_total == objective_loss + regularization_total` exactly,
//!   because all three are evaluated from the same solved point with the
//!   exact (unsmoothed) term definitions.
//! - Per-deviation contributions satisfy
//!   `y_fit = y_fit_base + Σ contributions` elementwise.
use crate::filtering::{
    core::{
        regularization::{DerivOrder, NormKind},
        samples::SampleSet,
    },
    errors::FilterResult,
    model::{assembler::TrendFilterProblem, interpolate::LinearInterpolator},
};
use crate::optimization::convex::SolveOutcome;
use ndarray::Array1;

/// Solved offsets and model contribution of one linear deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationFit {
    /// Spec name.
    pub name: String,
    /// Solved per-category offsets (length n_vars).
    pub offsets: Array1<f64>,
    /// Mapped contribution at the sample locations (length n).
    pub contribution: Array1<f64>,
}

/// Solved value of one tagged regularization term.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularizationValue {
    /// Term tag ("alpha_0", "alpha_1", "alpha_2", or a deviation's name).
    pub name: String,
    /// Derivative order the term acts on.
    pub order: DerivOrder,
    /// Norm the term uses.
    pub norm: NormKind,
    /// The term's weight.
    pub weight: f64,
    /// Exact term value at the solution.
    pub value: f64,
}

/// `TrendFilterFit` — everything a caller gets back from one fit.
///
/// Fields
/// ------
/// - `y_fit`: full model at the sample locations.
/// - `y_fit_base`: base model (cumulative curve) alone.
/// - `increments`: the solved increment variable (the base curve's
///   successive differences by construction).
/// - `deviations`: solved offsets and contributions, in spec order.
/// - `regularization`: exact per-term values, in term order.
/// - `regularization_total`: sum of the term values.
/// - `objective_loss`: exact robust-loss value at the solution.
/// - `objective_total`: `objective_loss + regularization_total`.
/// - `constraints`: labels of the equality constraints actually applied.
/// - `converged` / `status` / `iterations`: solver diagnostics.
/// - `function` / `function_base`: interpolators over the full and base
///   model with boundary-trend extrapolation.
#[derive(Debug, Clone)]
pub struct TrendFilterFit {
    pub y_fit: Array1<f64>,
    pub y_fit_base: Array1<f64>,
    pub increments: Array1<f64>,
    pub deviations: Vec<DeviationFit>,
    pub regularization: Vec<RegularizationValue>,
    pub regularization_total: f64,
    pub objective_loss: f64,
    pub objective_total: f64,
    pub constraints: Vec<String>,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub function: LinearInterpolator,
    pub function_base: LinearInterpolator,
}

/// Package a solved problem into a [`TrendFilterFit`].
///
/// Evaluates the model pieces and the exact term values at the solved
/// point and wraps the curves in interpolators. The solver's own
/// `objective_value` is not reused: the packaged decomposition is computed
/// from the exact term definitions so that
/// `objective_total == objective_loss + Σ term values` holds identically.
pub fn package(
    samples: &SampleSet, problem: &TrendFilterProblem, outcome: &SolveOutcome,
) -> FilterResult<TrendFilterFit> {
    let theta = &outcome.theta_hat;

    let increments = problem.increments(theta);
    let y_fit_base = problem.base_curve(theta);
    let y_fit = problem.full_model(theta);

    let deviations = problem
        .deviations()
        .iter()
        .map(|dev| {
            let offsets = problem.layout().owned(theta, dev.handle);
            let contribution = dev.mapping.dot(&offsets);
            DeviationFit { name: dev.name.clone(), offsets, contribution }
        })
        .collect();

    let term_values = problem.term_values(theta);
    let regularization: Vec<RegularizationValue> = problem
        .terms()
        .iter()
        .zip(term_values.iter())
        .map(|(term, &value)| RegularizationValue {
            name: term.name.clone(),
            order: term.order,
            norm: term.norm,
            weight: term.weight,
            value,
        })
        .collect();
    let regularization_total: f64 = term_values.iter().sum();
    let objective_loss = problem.loss_value(theta);

    let constraints =
        problem.constraints().equalities.iter().map(|eq| eq.label.clone()).collect();

    Ok(TrendFilterFit {
        function: LinearInterpolator::new(samples.x.clone(), y_fit.clone()),
        function_base: LinearInterpolator::new(samples.x.clone(), y_fit_base.clone()),
        y_fit,
        y_fit_base,
        increments,
        deviations,
        regularization,
        regularization_total,
        objective_loss,
        objective_total: objective_loss + regularization_total,
        constraints,
        converged: outcome.converged,
        status: outcome.status.clone(),
        iterations: outcome.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::core::{
        deviations::{DeviationMapping, LinearDeviationSpec},
        options::FilterOptions,
        samples::SampleSet,
    };
    use crate::filtering::model::assembler::assemble;
    use approx::assert_relative_eq;
    use argmin::core::TerminationStatus;
    use ndarray::array;
    use std::collections::HashMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests feed a hand-built SolveOutcome through `package` (no
    // numeric solver involved) and check the packaged identities:
    // objective decomposition, base-plus-contributions, and interpolator
    // wiring.
    // -------------------------------------------------------------------------

    fn outcome_for(theta: ndarray::Array1<f64>, objective_value: f64) -> SolveOutcome {
        SolveOutcome::new(
            Some(theta),
            objective_value,
            TerminationStatus::Terminated(argmin::core::TerminationReason::MaxItersReached),
            7,
            HashMap::new(),
            None,
        )
        .expect("outcome should validate")
    }

    #[test]
    // Purpose
    // -------
    // Verify the packaged identities on a problem with one deviation.
    //
    // Given
    // -----
    // - A fixed stacked point standing in for a solution.
    //
    // Expect
    // ------
    // - y_fit = y_fit_base + contribution; objective_total equals loss
    //   plus the term sum; constraint labels carried through; function
    //   evaluates the full model at the knots.
    fn packaged_identities_hold() {
        // Arrange
        let samples = SampleSet::new(
            array![0.0, 1.0, 2.0, 4.0],
            array![1.0, 2.0, 1.5, 3.0],
            None,
        )
        .expect("valid samples");
        let mut opts = FilterOptions::default();
        opts.alpha_2 = 0.5;
        opts.constrain_zero = true;
        opts.linear_deviations = vec![LinearDeviationSpec::new(
            "seasonal",
            2,
            0.1,
            DeviationMapping::PerSample(vec![0, 1, 0, 1]),
        )
        .expect("valid spec")];
        let problem = assemble(&samples, &opts).expect("assembly should succeed");
        let theta = array![0.2, 0.8, -0.3, 1.0, 0.4, -0.2];
        let outcome = outcome_for(theta.clone(), problem.loss_value(&theta));

        // Act
        let fit = package(&samples, &problem, &outcome).expect("packaging should succeed");

        // Assert
        assert_eq!(fit.y_fit.len(), samples.len());
        for i in 0..samples.len() {
            let rebuilt = fit.y_fit_base[i] + fit.deviations[0].contribution[i];
            assert_relative_eq!(fit.y_fit[i], rebuilt, epsilon = 1e-12);
        }
        let term_sum: f64 = fit.regularization.iter().map(|t| t.value).sum();
        assert_relative_eq!(fit.regularization_total, term_sum, epsilon = 1e-12);
        assert_relative_eq!(
            fit.objective_total,
            fit.objective_loss + fit.regularization_total,
            epsilon = 1e-12
        );
        assert!(fit.regularization.iter().all(|t| t.value >= 0.0));
        assert_eq!(fit.constraints, vec!["model[0] == 0".to_string()]);
        assert_eq!(fit.deviations[0].offsets, array![0.4, -0.2]);
        assert_relative_eq!(fit.function.eval(1.0), fit.y_fit[1], epsilon = 1e-12);
        assert_relative_eq!(fit.function_base.eval(1.0), fit.y_fit_base[1], epsilon = 1e-12);
        assert_eq!(fit.iterations, 7);
    }
}
