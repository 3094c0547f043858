#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::filtering::core::deviations::{DeviationMapping, LinearDeviationSpec};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Tolerant extraction of a 1-D float64 array from Python.
///
/// Accepts a contiguous `numpy.ndarray`, anything with a `to_numpy`
/// method (e.g. `pandas.Series`), or a plain sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Extract linear-deviation specs from the Python call.
///
/// Accepts `None` (no deviations) or a sequence of
/// `(name, n_vars, alpha, categories)` tuples where `categories` holds one
/// category index per sample. Spec-level validation (codomain, alpha sign)
/// happens in [`LinearDeviationSpec::new`]; coverage against the grid is
/// checked at assembly time.
#[cfg(feature = "python-bindings")]
pub fn extract_deviation_specs(
    raw: Option<&Bound<'_, PyAny>>,
) -> PyResult<Vec<LinearDeviationSpec>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let tuples: Vec<(String, usize, f64, Vec<usize>)> = raw.extract().map_err(|_| {
        PyValueError::new_err(
            "linear_deviations must be a sequence of (name, n_vars, alpha, categories) tuples",
        )
    })?;
    let mut specs = Vec::with_capacity(tuples.len());
    for (name, n_vars, alpha, categories) in tuples {
        let spec =
            LinearDeviationSpec::new(name, n_vars, alpha, DeviationMapping::PerSample(categories))?;
        specs.push(spec);
    }
    Ok(specs)
}
