//! Public API surface for constrained convex minimization.
//!
//! - [`ConvexObjective`]: trait the formulation engine implements for an
//!   assembled program's objective.
//! - [`ConstraintSet`] and [`LinearConstraint`]: the constraint side of the
//!   solver contract (non-negative variables, linear equalities).
//! - [`Solver`]: the external-collaborator capability — objective plus
//!   constraints in, variable values or failure out.
//! - [`SolverOptions`] and [`Tolerances`]: configuration for the default
//!   backend.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`SolveOutcome`]: normalized result returned by [`Solver::solve`].
//!
//! Convention: the objective is *minimized* directly; there is no
//! log-likelihood style sign flip anywhere in this layer.
use crate::optimization::{
    convex::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_solution, validate_value, verify_tol_cost, verify_tol_grad},
    },
    errors::{SolveResult, SolverError},
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use ndarray::Array1;
use std::str::FromStr;

/// Objective side of a convex program, implemented by the formulation engine.
///
/// The solver sees only this surface: the stacked variable dimension, the
/// scalar value at a point, and (optionally) the gradient. If `grad` is not
/// implemented, robust finite differences are used automatically by the
/// backend adapter.
///
/// Required:
/// - `dim() -> usize`: length of the stacked variable vector.
/// - `value(&Theta) -> SolveResult<Cost>`: evaluate the objective.
///   - Errors: return a descriptive `SolverError` for invalid inputs.
///
/// Optional:
/// - `grad(&Theta) -> SolveResult<Grad>`: analytic gradient of the
///   objective. The default returns `GradientNotImplemented`, which the
///   adapter treats as a request for finite differences.
pub trait ConvexObjective {
    fn dim(&self) -> usize;
    fn value(&self, theta: &Theta) -> SolveResult<Cost>;

    fn grad(&self, _theta: &Theta) -> SolveResult<Grad> {
        Err(SolverError::GradientNotImplemented)
    }
}

/// A single linear equality constraint `coeffs · θ == rhs` over the stacked
/// variable vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Human-readable label, e.g. `"model[0] == 0"`.
    pub label: String,
    /// Dense coefficient row over the full stacked variable vector.
    pub coeffs: Array1<f64>,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(label: impl Into<String>, coeffs: Array1<f64>, rhs: f64) -> Self {
        Self { label: label.into(), coeffs, rhs }
    }

    /// Signed residual `coeffs · θ − rhs` at a point.
    pub fn violation(&self, theta: &Theta) -> f64 {
        self.coeffs.dot(theta) - self.rhs
    }
}

/// Constraint side of the solver contract.
///
/// - `nonneg[i] == true` declares θ\[i\] non-negative. This is how the
///   formulation engine expresses monotonicity: the increment block is
///   sign-constrained, never the curve itself.
/// - `equalities` holds linear equality rows (currently: the optional
///   zero-at-origin constraint on the full model's first point).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    pub nonneg: Vec<bool>,
    pub equalities: Vec<LinearConstraint>,
}

impl ConstraintSet {
    /// An unconstrained set over `dim` variables.
    pub fn unconstrained(dim: usize) -> Self {
        Self { nonneg: vec![false; dim], equalities: Vec::new() }
    }

    /// True when at least one variable carries a non-negativity flag.
    pub fn has_nonneg(&self) -> bool {
        self.nonneg.iter().any(|&b| b)
    }

    /// Validate the set against the objective dimension.
    ///
    /// # Errors
    /// - [`SolverError::NonNegMaskDimMismatch`] if the mask length differs
    ///   from `dim`.
    /// - [`SolverError::ConstraintDimMismatch`] if an equality row differs
    ///   from `dim`.
    /// - [`SolverError::NonFiniteConstraint`] if a coefficient or rhs is
    ///   NaN/±∞.
    pub fn validate(&self, dim: usize) -> SolveResult<()> {
        if self.nonneg.len() != dim {
            return Err(SolverError::NonNegMaskDimMismatch {
                expected: dim,
                found: self.nonneg.len(),
            });
        }
        for eq in &self.equalities {
            if eq.coeffs.len() != dim {
                return Err(SolverError::ConstraintDimMismatch {
                    label: eq.label.clone(),
                    expected: dim,
                    found: eq.coeffs.len(),
                });
            }
            for &c in eq.coeffs.iter() {
                if !c.is_finite() {
                    return Err(SolverError::NonFiniteConstraint {
                        label: eq.label.clone(),
                        value: c,
                    });
                }
            }
            if !eq.rhs.is_finite() {
                return Err(SolverError::NonFiniteConstraint {
                    label: eq.label.clone(),
                    value: eq.rhs,
                });
            }
        }
        Ok(())
    }
}

/// The solver collaborator capability.
///
/// Given a convex objective, a constraint set over its variables, and an
/// initial point, return either optimal values for every variable together
/// with the achieved objective value, or a failure status — never stale or
/// partial values. The formulation engine is written against this trait
/// only, so tests can substitute a stub implementation.
pub trait Solver {
    fn solve<O: ConvexObjective>(
        &self, objective: &O, constraints: &ConstraintSet, theta0: Theta,
    ) -> SolveResult<SolveOutcome>;
}

/// Choice of line search used inside the L-BFGS backend.
///
/// Variants:
/// - `MoreThuente`: More–Thuente line search.
/// - `HagerZhang`: Hager–Zhang line search.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `SolverError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(SolverError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Numerical tolerances and iteration limits used by the backend.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`SolverError::NoTolerancesProvided`] if all three are `None`.
    /// - [`SolverError::InvalidTolGrad`] / [`SolverError::InvalidTolCost`]
    ///   for non-finite or non-positive tolerances.
    /// - `SolverError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> SolveResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(SolverError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(SolverError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Backend-level configuration for the default L-BFGS solver.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `lbfgs_mem` — optional L-BFGS history size (default 7 when `None`).
/// - `verbose: bool` — if `true`, attaches an observer (behind the
///   `obs_slog` feature) and prints progress.
/// - `penalty_weight` — quadratic weight enforcing equality constraints
///   inside the backend; the reported objective excludes it.
/// - `smoothing` — pseudo-abs epsilon the formulation may apply to L1 kinks
///   so the line search stays well-behaved; exact values are still used for
///   result packaging.
///
/// Default:
/// - `tols`: `tol_grad = 1e-8`, `tol_cost = 1e-12`, `max_iter = 500`
/// - `line_searcher`: `MoreThuente`
/// - `lbfgs_mem`: `None`
/// - `verbose`: `false`
/// - `penalty_weight`: `1e8`
/// - `smoothing`: `1e-6`
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
    pub verbose: bool,
    pub penalty_weight: f64,
    pub smoothing: f64,
}

impl SolverOptions {
    /// Create a validated set of solver options.
    ///
    /// Numeric validation of `tols` happens in [`Tolerances::new`]; this
    /// constructor checks the remaining fields.
    ///
    /// # Errors
    /// - [`SolverError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    /// - [`SolverError::InvalidPenaltyWeight`] if the weight is non-finite
    ///   or ≤ 0.
    /// - [`SolverError::InvalidSmoothing`] if the epsilon is non-finite or
    ///   negative.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: Option<usize>, verbose: bool,
        penalty_weight: f64, smoothing: f64,
    ) -> SolveResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(SolverError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        if !penalty_weight.is_finite() || penalty_weight <= 0.0 {
            return Err(SolverError::InvalidPenaltyWeight {
                value: penalty_weight,
                reason: "Penalty weight must be finite and strictly positive.",
            });
        }
        if !smoothing.is_finite() || smoothing < 0.0 {
            return Err(SolverError::InvalidSmoothing {
                value: smoothing,
                reason: "Smoothing epsilon must be finite and non-negative.",
            });
        }
        Ok(Self { tols, line_searcher, lbfgs_mem, verbose, penalty_weight, smoothing })
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::new(Some(1e-8), Some(1e-12), Some(500)).unwrap(),
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
            verbose: false,
            penalty_weight: 1e8,
            smoothing: 1e-6,
        }
    }
}

/// Canonical result returned by [`Solver::solve`].
///
/// - `theta_hat`: best stacked variable vector found, in model space (any
///   internal solver-space transform has already been undone).
/// - `objective_value`: objective value at `theta_hat`, excluding any
///   internal penalty terms.
/// - `converged`: `true` if the backend reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of solver iterations performed.
/// - `fn_evals`: function-evaluation counters reported by the backend.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub theta_hat: Theta,
    pub objective_value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl SolveOutcome {
    /// Build a validated [`SolveOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_solution` (present and all finite).
    /// - `objective_value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`.
    /// - Computes `grad_norm` if a gradient was provided.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or the value.
    pub fn new(
        theta_hat_opt: Option<Theta>, objective_value: f64, converged: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> SolveResult<Self> {
        let theta_hat = validate_solution(theta_hat_opt)?;
        validate_value(objective_value)?;
        let status: String;
        let converged = match converged {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            _ => {
                status = format!("{converged:?}");
                true
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, objective_value, converged, status, iterations, fn_evals, grad_norm })
    }
}
