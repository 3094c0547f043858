//! High-level entry point for solving a constrained convex program.
//!
//! This selects an L-BFGS backend with either Hager–Zhang or More–Thuente
//! line search, wraps the objective and constraints in a
//! [`ConstrainedAdapter`] (softplus transform for non-negative variables,
//! quadratic penalty for equalities), delegates the run to `run_lbfgs`, and
//! normalizes the result back into model space.
use crate::optimization::{
    convex::{
        adapter::ConstrainedAdapter,
        builders::{build_lbfgs_hager_zhang, build_lbfgs_more_thuente},
        run::run_lbfgs,
        traits::{ConstraintSet, ConvexObjective, LineSearcher, SolveOutcome, Solver,
                 SolverOptions},
        types::Theta,
        validation::validate_theta0,
    },
    errors::{SolveResult, SolverError},
};

/// Minimize a convex objective subject to a constraint set.
///
/// # Behavior
/// - Validates `theta0` against `objective.dim()` and the constraint set
///   against the same dimension.
/// - Maps the (model-space) initial point into solver space through the
///   adapter's variable transform.
/// - Builds an L-BFGS backend with the configured line search, runs it, and
///   maps the best point back into model space.
/// - Re-evaluates the objective at the solution so the reported
///   `objective_value` excludes the internal equality penalty.
///
/// # Parameters
/// - `objective`: The assembled program objective.
/// - `constraints`: Non-negativity mask and equality rows over its
///   variables.
/// - `theta0`: Initial stacked variable vector in model space.
/// - `opts`: Solver options (tolerances, line search choice, penalty
///   weight, verbosity).
///
/// # Errors
/// - Propagates validation errors for `theta0` and `constraints`.
/// - Propagates builder errors from `build_lbfgs_*`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search
///   failures) and [`SolverError::MissingSolution`] when the backend
///   reports no best parameter.
///
/// # Returns
/// A [`SolveOutcome`] with the model-space solution, the achieved objective
/// value, termination status, iteration count, and evaluation counters.
pub fn minimize<O: ConvexObjective>(
    objective: &O, constraints: &ConstraintSet, theta0: Theta, opts: &SolverOptions,
) -> SolveResult<SolveOutcome> {
    let dim = objective.dim();
    validate_theta0(&theta0, dim)?;
    constraints.validate(dim)?;

    let problem = ConstrainedAdapter::new(objective, constraints, opts.penalty_weight);
    let u0 = problem.to_solver_space(&theta0);

    let raw = match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_lbfgs_more_thuente(opts)?;
            run_lbfgs(u0, opts, problem.clone(), solver)?
        }
        LineSearcher::HagerZhang => {
            let solver = build_lbfgs_hager_zhang(opts)?;
            run_lbfgs(u0, opts, problem.clone(), solver)?
        }
    };

    let u_hat = raw.best_param.ok_or(SolverError::MissingSolution)?;
    let theta_hat = problem.to_model_space(&u_hat);
    let objective_value = objective.value(&theta_hat)?;

    SolveOutcome::new(
        Some(theta_hat),
        objective_value,
        raw.termination,
        raw.iterations,
        raw.fn_evals,
        raw.grad,
    )
}

/// The default solver collaborator: argmin L-BFGS behind the [`Solver`]
/// trait.
///
/// Internals (softplus transform, quadratic equality penalty, line-search
/// smoothing) are implementation details of this collaborator; the
/// formulation engine depends only on the trait contract and can be tested
/// against stub solvers instead.
#[derive(Debug, Clone, Default)]
pub struct LbfgsSolver {
    pub opts: SolverOptions,
}

impl LbfgsSolver {
    /// Construct a solver with explicit options.
    pub fn new(opts: SolverOptions) -> Self {
        Self { opts }
    }
}

impl Solver for LbfgsSolver {
    fn solve<O: ConvexObjective>(
        &self, objective: &O, constraints: &ConstraintSet, theta0: Theta,
    ) -> SolveResult<SolveOutcome> {
        minimize(objective, constraints, theta0, &self.opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{convex::types::{Cost, Grad}, errors::SolveResult};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Unconstrained minimization of a smooth convex bowl.
    // - Non-negativity handling through the softplus transform.
    // - Equality handling through the quadratic penalty.
    // - Validation failures surfacing before any backend run.
    //
    // They intentionally DO NOT cover:
    // - The trend-filter formulation itself; that is exercised by the
    //   filtering module and the integration tests.
    // -------------------------------------------------------------------------

    /// Shifted quadratic bowl `Σ (θ_i − c_i)²` with minimum at `c`.
    struct Bowl {
        center: Array1<f64>,
    }

    impl ConvexObjective for Bowl {
        fn dim(&self) -> usize {
            self.center.len()
        }

        fn value(&self, theta: &Array1<f64>) -> SolveResult<Cost> {
            let d = theta - &self.center;
            Ok(d.dot(&d))
        }

        fn grad(&self, theta: &Array1<f64>) -> SolveResult<Grad> {
            Ok(2.0 * (theta - &self.center))
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the default solver finds the minimum of a smooth bowl.
    //
    // Given
    // -----
    // - A 3-d bowl centered at (1, −2, 0.5), no constraints.
    //
    // Expect
    // ------
    // - Solution within 1e-5 of the center, objective near zero.
    fn minimizes_unconstrained_bowl() {
        // Arrange
        let objective = Bowl { center: array![1.0, -2.0, 0.5] };
        let constraints = ConstraintSet::unconstrained(3);
        let opts = SolverOptions::default();

        // Act
        let out = minimize(&objective, &constraints, array![0.0, 0.0, 0.0], &opts)
            .expect("solve should succeed on a smooth bowl");

        // Assert
        assert!(out.converged, "solver should report a terminating status");
        for (i, &c) in objective.center.iter().enumerate() {
            assert_abs_diff_eq!(out.theta_hat[i], c, epsilon = 1e-5);
        }
        assert!(out.objective_value < 1e-9, "objective should be near zero at the center");
    }

    #[test]
    // Purpose
    // -------
    // Ensure a non-negativity flag keeps the solution in the admissible
    // region even when the unconstrained minimum is negative.
    //
    // Given
    // -----
    // - A bowl centered at (−1, 2) with θ[0] flagged non-negative.
    //
    // Expect
    // ------
    // - θ̂[0] ≥ 0 and close to the constrained optimum 0; θ̂[1] ≈ 2.
    fn respects_nonneg_mask() {
        // Arrange
        let objective = Bowl { center: array![-1.0, 2.0] };
        let constraints =
            ConstraintSet { nonneg: vec![true, false], equalities: Vec::new() };
        let opts = SolverOptions::default();

        // Act
        let out = minimize(&objective, &constraints, array![0.5, 0.0], &opts)
            .expect("solve should succeed");

        // Assert
        assert!(out.theta_hat[0] >= 0.0, "masked variable must stay non-negative");
        assert!(out.theta_hat[0] < 1e-3, "constrained optimum sits at the boundary");
        assert_abs_diff_eq!(out.theta_hat[1], 2.0, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Ensure an equality row is satisfied within the penalty tolerance and
    // the reported objective excludes the penalty.
    //
    // Given
    // -----
    // - A bowl centered at (1, 1) with the constraint θ[0] + θ[1] == 1.
    //
    // Expect
    // ------
    // - Residual below 1e-4; objective close to the analytic constrained
    //   optimum 0.5.
    fn satisfies_equality_within_tolerance() {
        // Arrange
        let objective = Bowl { center: array![1.0, 1.0] };
        let eq = crate::optimization::convex::traits::LinearConstraint::new(
            "sum == 1",
            array![1.0, 1.0],
            1.0,
        );
        let constraints = ConstraintSet { nonneg: vec![false, false], equalities: vec![eq] };
        let opts = SolverOptions::default();

        // Act
        let out = minimize(&objective, &constraints, array![0.0, 0.0], &opts)
            .expect("solve should succeed");

        // Assert
        let residual = out.theta_hat[0] + out.theta_hat[1] - 1.0;
        assert!(residual.abs() < 1e-4, "equality should hold within penalty tolerance");
        assert_abs_diff_eq!(out.objective_value, 0.5, epsilon = 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // Confirm dimension validation rejects a mismatched initial point
    // before the backend runs.
    //
    // Given
    // -----
    // - A 3-d bowl and a 2-d initial point.
    //
    // Expect
    // ------
    // - `SolverError::ThetaDimMismatch`.
    fn rejects_mismatched_initial_point() {
        // Arrange
        let objective = Bowl { center: array![0.0, 0.0, 0.0] };
        let constraints = ConstraintSet::unconstrained(3);

        // Act
        let result = minimize(&objective, &constraints, array![0.0, 0.0], &SolverOptions::default());

        // Assert
        assert!(matches!(
            result,
            Err(SolverError::ThetaDimMismatch { expected: 3, found: 2 })
        ));
    }
}
