//! Validation helpers for the convex solver layer.
//!
//! This module centralizes common consistency checks used across the
//! solver interface:
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Initial points**: [`validate_theta0`] checks dimension and finiteness
//!   before the backend ever runs.
//! - **Solutions**: [`validate_solution`] ensures a candidate solution
//!   exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks scalar outputs for
//!   finiteness.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`SolverError`] variants, making higher-level code more uniform and
//! easier to debug.
use crate::optimization::{
    convex::{Grad, Theta},
    errors::{SolveResult, SolverError},
};

/// Validate the optional gradient-norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`SolverError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> SolveResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(SolverError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(SolverError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance (for convergence).
///
/// - Accepts `None` (no stopping rule on cost change).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`SolverError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> SolveResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(SolverError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(SolverError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`SolverError::GradientDimMismatch`] if length does not match `dim`.
/// - [`SolverError::InvalidGradient`] with the index/value/reason of the
///   first offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> SolveResult<()> {
    if grad.len() != dim {
        return Err(SolverError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(SolverError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate an initial point against the objective dimension.
///
/// # Errors
/// - [`SolverError::ThetaDimMismatch`] if the length differs from `dim`.
/// - [`SolverError::InvalidThetaInput`] if any element is non-finite.
pub fn validate_theta0(theta0: &Theta, dim: usize) -> SolveResult<()> {
    if theta0.len() != dim {
        return Err(SolverError::ThetaDimMismatch { expected: dim, found: theta0.len() });
    }
    for (index, &value) in theta0.iter().enumerate() {
        if !value.is_finite() {
            return Err(SolverError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate and unwrap a solved variable vector.
///
/// Accepts only a present vector with all **finite** entries.
///
/// # Returns
/// The owned `Theta` if valid.
///
/// # Errors
/// - [`SolverError::MissingSolution`] if no vector was provided.
/// - [`SolverError::InvalidSolution`] if any element is non-finite.
pub fn validate_solution(theta_hat: Option<Theta>) -> SolveResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(SolverError::InvalidSolution {
                        index,
                        value,
                        reason: "Solved values must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(SolverError::MissingSolution),
    }
}

/// Validate that a scalar objective value is finite.
///
/// Negative values are fine as long as they are finite.
///
/// # Errors
/// Returns [`SolverError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> SolveResult<()> {
    if !value.is_finite() {
        return Err(SolverError::NonFiniteCost { value });
    }
    Ok(())
}
