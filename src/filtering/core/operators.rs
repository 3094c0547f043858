//! Grid operators — finite-difference matrices for non-evenly-spaced data.
//!
//! Purpose
//! -------
//! Build the dense operators the formulation engine applies to the
//! increment variable and the base model: the cumulative-sum matrix that
//! turns increments into a curve, and first/second-derivative matrices that
//! weight differences by the actual (possibly non-uniform) x-spacing rather
//! than by index distance.
//!
//! Key behaviors
//! -------------
//! - [`cumulative_matrix`]: n×n lower-triangular ones; curve = C · increments.
//! - [`first_derivative_matrix`]: (n−1)×n rows `(v[i+1] − v[i]) / h_i` so a
//!   slope penalty is comparable across unevenly spaced inputs.
//! - [`second_derivative_matrix`]: (n−2)×n divided-difference rows; with
//!   `scale_free` each row is rescaled by `h_i · h_{i+1}` so the penalty is
//!   invariant under a global rescaling of x. On a uniform grid the
//!   scale-free rows reduce to the classic `{1, −2, 1}` stencil.
//!
//! Invariants & assumptions
//! ------------------------
//! - x is strictly increasing (guaranteed upstream by `SampleSet`); all
//!   spacings `h_i = x[i+1] − x[i]` are strictly positive.
//! - Operators must be rebuilt whenever x changes; nothing here caches.
//! - n < 3 yields an empty (0×n) second-derivative matrix and n < 2 an
//!   empty first-derivative matrix; degenerate grids silence the penalty
//!   instead of failing.
//!
//! Testing notes
//! -------------
//! - Unit tests check shapes, spacing weighting on an irregular grid, the
//!   uniform-grid stencil, scale invariance of the scale-free rows, the
//!   degenerate small-n cases, and the dimension contract.
use crate::filtering::errors::{FilterError, FilterResult};
use ndarray::{Array1, Array2};

/// Lower-triangular matrix of ones, size n×n.
///
/// Maps the increment-style fit variable to the base curve via
/// matrix-vector product: `curve[i] = Σ_{j<=i} increments[j]`.
pub fn cumulative_matrix(n: usize) -> Array2<f64> {
    let mut m = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            m[(i, j)] = 1.0;
        }
    }
    m
}

/// First-derivative operator on a non-uniform grid.
///
/// Row i encodes `(v[i+1] − v[i]) / (x[i+1] − x[i])`. Returns a (n−1)×n
/// matrix; for n < 2 the result is an empty 0×n matrix (no penalty
/// contribution).
pub fn first_derivative_matrix(x: &Array1<f64>) -> Array2<f64> {
    let n = x.len();
    if n < 2 {
        return Array2::zeros((0, n));
    }
    let mut m = Array2::zeros((n - 1, n));
    for i in 0..n - 1 {
        let h = x[i + 1] - x[i];
        m[(i, i)] = -1.0 / h;
        m[(i, i + 1)] = 1.0 / h;
    }
    m
}

/// Second-derivative operator on a non-uniform grid.
///
/// Row i is the second divided difference over the triple
/// `(x[i], x[i+1], x[i+2])` with spacings `h1 = x[i+1] − x[i]` and
/// `h2 = x[i+2] − x[i+1]`:
///
/// ```text
/// raw:        { 2/(h1(h1+h2)),  −2/(h1 h2),  2/(h2(h1+h2)) }
/// scale-free: { 2h2/(h1+h2),    −2,          2h1/(h1+h2)   }
/// ```
///
/// The scale-free form multiplies the raw row by `h1·h2`, cancelling the
/// 1/x² units so that rescaling all spacings by a constant leaves the rows
/// (and any penalty built from them) unchanged; denser sampling in one
/// region then no longer biases the curvature penalty toward flatness
/// there. Returns a (n−2)×n matrix; for n < 3 the result is an empty 0×n
/// matrix.
pub fn second_derivative_matrix(x: &Array1<f64>, scale_free: bool) -> Array2<f64> {
    let n = x.len();
    if n < 3 {
        return Array2::zeros((0, n));
    }
    let mut m = Array2::zeros((n - 2, n));
    for i in 0..n - 2 {
        let h1 = x[i + 1] - x[i];
        let h2 = x[i + 2] - x[i + 1];
        let scf = if scale_free { h1 * h2 } else { 1.0 };
        m[(i, i)] = 2.0 * scf / (h1 * (h1 + h2));
        m[(i, i + 1)] = -2.0 * scf / (h1 * h2);
        m[(i, i + 2)] = 2.0 * scf / (h2 * (h1 + h2));
    }
    m
}

/// First-derivative values of a target vector on the grid.
///
/// Convenience form of [`first_derivative_matrix`] applied to an explicit
/// vector, used where an expression is wanted rather than an operator.
///
/// # Errors
/// Returns [`FilterError::OperatorDimMismatch`] when `x` and `v` differ in
/// length.
pub fn first_derivative(x: &Array1<f64>, v: &Array1<f64>) -> FilterResult<Array1<f64>> {
    if x.len() != v.len() {
        return Err(FilterError::OperatorDimMismatch { expected: x.len(), found: v.len() });
    }
    let n = x.len();
    if n < 2 {
        return Ok(Array1::zeros(0));
    }
    let mut out = Array1::zeros(n - 1);
    for i in 0..n - 1 {
        out[i] = (v[i + 1] - v[i]) / (x[i + 1] - x[i]);
    }
    Ok(out)
}
