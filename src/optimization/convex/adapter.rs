//! Adapter that exposes a constrained [`ConvexObjective`] as an `argmin`
//! problem.
//!
//! The backend iterates in an unconstrained solver space `u`. Variables
//! flagged non-negative in the [`ConstraintSet`] are mapped through
//! `safe_softplus` into model space `v`; unconstrained variables pass
//! through unchanged. Linear equality constraints are enforced with a
//! quadratic penalty on the model-space residuals. The cost the backend
//! sees is therefore
//!
//! ```text
//! c(u) = f(v(u)) + w · Σ_k (c_k · v(u) − r_k)²
//! ```
//!
//! where `f` is the user objective and `w` the penalty weight. Analytic
//! gradients (if provided by the objective) are chained through the
//! transform; otherwise the **cost** closure is finite-differenced, so no
//! chain rule is needed in that branch.
use std::cell::RefCell;

use crate::optimization::{
    convex::{
        traits::{ConstraintSet, ConvexObjective},
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
    errors::SolverError,
    numerical_stability::transformations::{safe_sigmoid, safe_softplus, safe_softplus_inv},
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a [`ConvexObjective`] plus [`ConstraintSet`] to `argmin`'s
/// `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `f(v(u))` plus the equality penalty.
/// - `Gradient::gradient` returns:
///   - the chained analytic gradient if the objective provides one, or
///   - a finite-difference gradient of the composed cost.
#[derive(Debug)]
pub struct ConstrainedAdapter<'a, O: ConvexObjective> {
    pub objective: &'a O,
    pub constraints: &'a ConstraintSet,
    pub penalty_weight: f64,
}

// Hand-written so cloning never demands `O: Clone`; only references are
// copied.
impl<'a, O: ConvexObjective> Clone for ConstrainedAdapter<'a, O> {
    fn clone(&self) -> Self {
        Self {
            objective: self.objective,
            constraints: self.constraints,
            penalty_weight: self.penalty_weight,
        }
    }
}

impl<'a, O: ConvexObjective> ConstrainedAdapter<'a, O> {
    /// Construct a new adapter over an objective and its constraint set.
    pub fn new(objective: &'a O, constraints: &'a ConstraintSet, penalty_weight: f64) -> Self {
        Self { objective, constraints, penalty_weight }
    }

    /// Map a solver-space point `u` into model space `v`.
    ///
    /// Softplus is applied elementwise where the non-negativity mask is
    /// set, so the backend can roam all of ℝ while the model only ever
    /// sees admissible values.
    pub fn to_model_space(&self, u: &Theta) -> Theta {
        let mut v = u.clone();
        for (value, &flag) in v.iter_mut().zip(self.constraints.nonneg.iter()) {
            if flag {
                *value = safe_softplus(*value);
            }
        }
        v
    }

    /// Map a model-space point `v` into solver space `u`.
    ///
    /// Inverts the softplus where the mask is set. Masked entries are
    /// floored at `1e-6` first so the inverse stays finite for zero (or
    /// slightly negative) warm-start increments.
    pub fn to_solver_space(&self, v: &Theta) -> Theta {
        let mut u = v.clone();
        for (value, &flag) in u.iter_mut().zip(self.constraints.nonneg.iter()) {
            if flag {
                *value = safe_softplus_inv(value.max(1e-6));
            }
        }
        u
    }

    /// Quadratic penalty on the equality residuals at a model-space point.
    fn penalty(&self, v: &Theta) -> f64 {
        let mut total = 0.0;
        for eq in &self.constraints.equalities {
            let r = eq.violation(v);
            total += r * r;
        }
        self.penalty_weight * total
    }

    /// Accumulate the model-space penalty gradient `2w Σ_k r_k c_k` into
    /// `grad`.
    fn penalty_grad_into(&self, v: &Theta, grad: &mut Grad) {
        for eq in &self.constraints.equalities {
            let r = eq.violation(v);
            let scale = 2.0 * self.penalty_weight * r;
            grad.scaled_add(scale, &eq.coeffs);
        }
    }
}

impl<'a, O: ConvexObjective> CostFunction for ConstrainedAdapter<'a, O> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the composed cost `f(v(u)) + penalty(v(u))`.
    ///
    /// - Calls the objective's `value` and checks the result is finite.
    /// - Returns `Error(NonFiniteCost)` if the composed value is not finite.
    ///
    /// # Errors
    /// Propagates any `SolverError` from the objective via `?`.
    fn cost(&self, u: &Self::Param) -> Result<Self::Output, Error> {
        let v = self.to_model_space(u);
        let output = self.objective.value(&v)? + self.penalty(&v);
        if !output.is_finite() {
            return Err((SolverError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<'a, O: ConvexObjective> Gradient for ConstrainedAdapter<'a, O> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the composed cost at `u`.
    ///
    /// Behavior:
    /// - If the objective implements `grad(v)`, we validate it, add the
    ///   penalty gradient, and chain through the transform
    ///   (`dv_i/du_i = sigmoid(u_i)` for softplus entries, `1` otherwise).
    /// - Otherwise, we compute a finite-difference gradient of the
    ///   **composed cost**:
    ///   - Try *central* differences first.
    ///   - If any evaluation of the `cost` closure failed (captured via
    ///     `closure_err`), retry with *forward* differences.
    ///   - Validate the FD gradient; if it fails (e.g., non-finite), retry
    ///     once with *forward* differences and validate again.
    ///
    /// Implementation notes:
    /// - The FD closure must return `f64`, so we can't use `?` inside it; we
    ///   capture the first error in `closure_err` and return `NaN` from the
    ///   closure. After FD, we turn that captured error back into a real
    ///   error (or switch to forward diff).
    ///
    /// # Errors
    /// - Propagates objective errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, u: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = u.len();
        let v = self.to_model_space(u);
        match self.objective.grad(&v) {
            Ok(mut g) => {
                validate_grad(&g, dim)?;
                self.penalty_grad_into(&v, &mut g);
                for ((gi, &ui), &flag) in
                    g.iter_mut().zip(u.iter()).zip(self.constraints.nonneg.iter())
                {
                    if flag {
                        *gi *= safe_sigmoid(ui);
                    }
                }
                Ok(g)
            }
            Err(e) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                match e {
                    SolverError::GradientNotImplemented => {
                        let cost_func = |point: &Theta| -> f64 {
                            match self.cost(point) {
                                Ok(val) => val,
                                Err(e) => {
                                    let mut slot = closure_err.borrow_mut();
                                    if slot.is_none() {
                                        *slot = Some(e);
                                    }
                                    f64::NAN
                                }
                            }
                        };
                        let mut fd_grad = u.central_diff(&cost_func);
                        if closure_err.borrow().is_some() {
                            fd_grad = run_fd_diff(u, &cost_func, &closure_err)?;
                            return Ok(fd_grad);
                        }
                        match validate_grad(&fd_grad, dim) {
                            Ok(()) => Ok(fd_grad),
                            Err(_) => {
                                fd_grad = run_fd_diff(u, &cost_func, &closure_err)?;
                                Ok(fd_grad)
                            }
                        }
                    }
                    _ => Err(e.into()),
                }
            }
        }
    }
}

/// Compute a forward-difference gradient of `func` at `u`, with error capture.
///
/// The FD closure can't return `Result`, so any error raised by `func` is
/// stored into `closure_err` and the closure returns `NaN`. This helper:
/// - clears `closure_err`,
/// - performs `forward_diff`,
/// - if an error was captured, returns it as `Err`,
/// - validates the resulting gradient,
/// - if validation succeeds, returns the gradient as `Ok(grad)`.
///
/// # Errors
/// Returns any error captured during evaluation of `func` inside the FD
/// routine or by validation of the resulting gradient.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    u: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = u.forward_diff(func);
    let dim = u.len();
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}
