//! Linear deviation terms — exogenous categorical effects.
//!
//! Purpose
//! -------
//! Describe and validate the optional "seasonal" components of the model:
//! each [`LinearDeviationSpec`] maps every sample to one of `n_vars`
//! categories (or to a soft weight row over them), declares a fresh
//! deviation variable of length `n_vars`, and contributes
//! `M · deviation_variable` additively to the model, shrunk by its own
//! regularization weight independent of the global alphas.
//!
//! Key behaviors
//! -------------
//! - [`DeviationMapping`] supports a per-sample category table, a function
//!   of x, and — as the documented soft-assignment extension — an explicit
//!   weight matrix with fractional rows.
//! - [`LinearDeviationSpec::new`] validates name/codomain/weight at
//!   construction time, not first use.
//! - [`LinearDeviationSpec::mapping_matrix`] builds the n×n_vars matrix,
//!   one-hot per row for the categorical mappings, enforcing that every
//!   produced category lies inside the declared codomain.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n_vars >= 1`; `alpha` finite and ≥ 0 (zero leaves the per-category
//!   offsets unshrunk — free parameters fit purely by the data term).
//! - Specs are processed in the order supplied; no implicit sorting.
use crate::filtering::errors::{FilterError, FilterResult};
use ndarray::{Array1, Array2};

/// How samples are assigned to deviation categories.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviationMapping {
    /// Explicit category index per sample (validated against n and the
    /// codomain at matrix-build time).
    PerSample(Vec<usize>),
    /// Category as a function of the sample location, e.g. month-of-year
    /// from a day index.
    OfX(fn(f64) -> usize),
    /// Soft assignment: an explicit n×n_vars weight matrix whose rows may
    /// be fractional. Supported extension; the categorical mappings above
    /// are the default.
    Weights(Array2<f64>),
}

/// `LinearDeviationSpec` — one validated exogenous deviation component.
///
/// Fields
/// ------
/// - `name`: identifier used in diagnostics, term tags, and errors.
/// - `n_vars`: number of categories (length of the deviation variable).
/// - `alpha`: shrinkage weight for this component's own penalty term.
/// - `mapping`: sample → category assignment (see [`DeviationMapping`]).
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDeviationSpec {
    pub name: String,
    pub n_vars: usize,
    pub alpha: f64,
    pub mapping: DeviationMapping,
}

impl LinearDeviationSpec {
    /// Construct a validated spec.
    ///
    /// # Errors
    /// - [`FilterError::EmptyDeviation`] when `n_vars == 0`.
    /// - [`FilterError::InvalidDeviationAlpha`] for NaN/±∞ or negative
    ///   `alpha`.
    pub fn new(
        name: impl Into<String>, n_vars: usize, alpha: f64, mapping: DeviationMapping,
    ) -> FilterResult<Self> {
        let name = name.into();
        if n_vars == 0 {
            return Err(FilterError::EmptyDeviation { name });
        }
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(FilterError::InvalidDeviationAlpha { name, value: alpha });
        }
        Ok(Self { name, n_vars, alpha, mapping })
    }

    /// Build the n×n_vars mapping matrix for a grid.
    ///
    /// Categorical mappings produce exactly one 1 per row; the weights
    /// variant is passed through after shape and finiteness checks.
    ///
    /// # Errors
    /// - [`FilterError::DeviationMappingLength`] when a per-sample table
    ///   does not cover every sample.
    /// - [`FilterError::DeviationCategoryOutOfRange`] when a produced
    ///   category is ≥ `n_vars`.
    /// - [`FilterError::DeviationWeightsShape`] /
    ///   [`FilterError::NonFiniteDeviationWeight`] for malformed weight
    ///   matrices.
    pub fn mapping_matrix(&self, x: &Array1<f64>) -> FilterResult<Array2<f64>> {
        let n = x.len();
        match &self.mapping {
            DeviationMapping::PerSample(categories) => {
                if categories.len() != n {
                    return Err(FilterError::DeviationMappingLength {
                        name: self.name.clone(),
                        expected: n,
                        actual: categories.len(),
                    });
                }
                self.one_hot(categories.iter().copied())
            }
            DeviationMapping::OfX(f) => self.one_hot(x.iter().map(|&xi| f(xi))),
            DeviationMapping::Weights(weights) => {
                if weights.dim() != (n, self.n_vars) {
                    return Err(FilterError::DeviationWeightsShape {
                        name: self.name.clone(),
                        expected: (n, self.n_vars),
                        found: weights.dim(),
                    });
                }
                for ((row, col), &value) in weights.indexed_iter() {
                    if !value.is_finite() {
                        return Err(FilterError::NonFiniteDeviationWeight {
                            name: self.name.clone(),
                            row,
                            col,
                            value,
                        });
                    }
                }
                Ok(weights.clone())
            }
        }
    }

    fn one_hot(&self, categories: impl Iterator<Item = usize>) -> FilterResult<Array2<f64>> {
        let categories: Vec<usize> = categories.collect();
        let mut m = Array2::zeros((categories.len(), self.n_vars));
        for (index, &category) in categories.iter().enumerate() {
            if category >= self.n_vars {
                return Err(FilterError::DeviationCategoryOutOfRange {
                    name: self.name.clone(),
                    index,
                    category,
                    n_vars: self.n_vars,
                });
            }
            m[(index, category)] = 1.0;
        }
        Ok(m)
    }
}
