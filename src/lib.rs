//! trendfilter — robust trend filtering for noisy, irregularly spaced 1-D
//! data, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the trend-filter entry point to Python via the `_trendfilter`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing function and result class used by the
//! `trendfilter` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`filtering` and `optimization`) as
//!   the public crate surface.
//! - Define the `#[pyfunction]`/`#[pyclass]` wrappers and the
//!   `#[pymodule]` initializer for the `_trendfilter` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   this file performs only FFI glue, input validation, and error
//!   mapping.
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in the core modules are assumed to hold.
//!
//! Conventions
//! -----------
//! - The Python call signature mirrors the original package:
//!   `trend_filter(x, y, y_err=None, alpha_0=0, alpha_1=0, alpha_2=0,
//!   l_norm=2, constrain_zero=False, monotonic=False,
//!   linear_deviations=None)`.
//! - Linear deviations arrive as `(name, n_vars, alpha, categories)`
//!   tuples with one category index per sample.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - External users are expected to interact with either the safe Rust
//!   APIs or the Python wrappers; the PyO3 plumbing is considered
//!   internal.

pub mod filtering;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    filtering::{
        api,
        core::{options::FilterOptions, regularization::NormKind, samples::SampleSet},
        model::result::TrendFilterFit,
    },
    utils::{extract_deviation_specs, extract_f64_array},
};

/// TrendFilterResult — Python-facing wrapper for a solved fit.
///
/// Purpose
/// -------
/// Present the solved curve, its decomposition, and the interpolation
/// functions of a [`TrendFilterFit`] to Python code in a lightweight,
/// read-only wrapper.
///
/// Key behaviors
/// -------------
/// - Expose `y_fit`, `y_fit_base`, the objective decomposition, per-term
///   regularization values, the applied constraint labels, and solver
///   diagnostics as properties.
/// - Provide `predict` / `predict_base` methods evaluating the packaged
///   interpolators at arbitrary (including extrapolated) locations.
///
/// Notes
/// -----
/// - Instances are created by [`trend_filter`]; Rust callers should use
///   [`TrendFilterFit`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "trendfilter")]
pub struct TrendFilterResult {
    /// The packaged Rust-side fit.
    inner: TrendFilterFit,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl TrendFilterResult {
    /// Full model values at the input sample locations.
    #[getter]
    pub fn y_fit(&self) -> Vec<f64> {
        self.inner.y_fit.to_vec()
    }

    /// Base model (cumulative curve) values alone.
    #[getter]
    pub fn y_fit_base(&self) -> Vec<f64> {
        self.inner.y_fit_base.to_vec()
    }

    /// Exact robust-loss value at the solution.
    #[getter]
    pub fn objective_loss(&self) -> f64 {
        self.inner.objective_loss
    }

    /// Loss plus the regularization total.
    #[getter]
    pub fn objective_total(&self) -> f64 {
        self.inner.objective_total
    }

    /// Sum of the per-term regularization values.
    #[getter]
    pub fn regularization_total(&self) -> f64 {
        self.inner.regularization_total
    }

    /// `(name, weight, value)` for every tagged term, in term order.
    #[getter]
    pub fn regularization(&self) -> Vec<(String, f64, f64)> {
        self.inner
            .regularization
            .iter()
            .map(|t| (t.name.clone(), t.weight, t.value))
            .collect()
    }

    /// Labels of the equality constraints actually applied.
    #[getter]
    pub fn constraints(&self) -> Vec<String> {
        self.inner.constraints.clone()
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    /// Evaluate the full-model interpolator at arbitrary locations.
    pub fn predict<'py>(&self, py: Python<'py>, xs: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        let arr: PyReadonlyArray1<f64> = extract_f64_array(py, xs)?;
        let slice = arr.as_slice().map_err(|_| {
            PyValueError::new_err("xs must be a 1-D contiguous float64 array or sequence")
        })?;
        Ok(slice.iter().map(|&t| self.inner.function.eval(t)).collect())
    }

    /// Evaluate the base-model interpolator at arbitrary locations.
    pub fn predict_base<'py>(
        &self, py: Python<'py>, xs: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let arr: PyReadonlyArray1<f64> = extract_f64_array(py, xs)?;
        let slice = arr.as_slice().map_err(|_| {
            PyValueError::new_err("xs must be a 1-D contiguous float64 array or sequence")
        })?;
        Ok(slice.iter().map(|&t| self.inner.function_base.eval(t)).collect())
    }
}

/// Fit a trend filter from Python.
///
/// Mirrors the original package's call signature; see the module docs for
/// the accepted `linear_deviations` tuple form. Returns a
/// [`TrendFilterResult`].
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        x,
        y,
        y_err = None,
        alpha_0 = 0.0,
        alpha_1 = 0.0,
        alpha_2 = 0.0,
        l_norm = 2,
        constrain_zero = false,
        monotonic = false,
        linear_deviations = None,
    ),
    text_signature = "(x, y, /, y_err=None, alpha_0=0.0, alpha_1=0.0, alpha_2=0.0, l_norm=2, \
                      constrain_zero=False, monotonic=False, linear_deviations=None)"
)]
pub fn trend_filter<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>, y_err: Option<&Bound<'py, PyAny>>,
    alpha_0: f64, alpha_1: f64, alpha_2: f64, l_norm: u32, constrain_zero: bool, monotonic: bool,
    linear_deviations: Option<&Bound<'py, PyAny>>,
) -> PyResult<TrendFilterResult> {
    let x_arr = extract_f64_array(py, x)?;
    let y_arr = extract_f64_array(py, y)?;
    let x_vec = Array1::from(
        x_arr
            .as_slice()
            .map_err(|_| PyValueError::new_err("x must be a 1-D contiguous float64 array"))?
            .to_vec(),
    );
    let y_vec = Array1::from(
        y_arr
            .as_slice()
            .map_err(|_| PyValueError::new_err("y must be a 1-D contiguous float64 array"))?
            .to_vec(),
    );
    let y_err_vec = match y_err {
        Some(raw) => {
            let arr = extract_f64_array(py, raw)?;
            let slice = arr.as_slice().map_err(|_| {
                PyValueError::new_err("y_err must be a 1-D contiguous float64 array")
            })?;
            Some(Array1::from(slice.to_vec()))
        }
        None => None,
    };

    let samples = SampleSet::new(x_vec, y_vec, y_err_vec)?;
    let norm = NormKind::from_l_norm(l_norm)?;
    let specs = extract_deviation_specs(linear_deviations)?;
    let opts = FilterOptions::new(
        alpha_0,
        alpha_1,
        alpha_2,
        norm,
        constrain_zero,
        monotonic,
        specs,
        Default::default(),
    )?;

    let fit = api::trend_filter(&samples, &opts)?;
    Ok(TrendFilterResult { inner: fit })
}

/// `_trendfilter` — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _trendfilter<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(trend_filter, m)?)?;
    m.add_class::<TrendFilterResult>()?;
    Ok(())
}
