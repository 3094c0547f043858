//! Problem assembly — from validated inputs to a solver-ready program.
//!
//! Purpose
//! -------
//! Wire the formulation pieces into one [`TrendFilterProblem`]: declare the
//! increment variable (non-negative iff monotonic) and one variable per
//! linear deviation, compose the full model expression, build the ordered
//! regularization terms, attach the optional zero-at-origin equality, and
//! expose the whole thing to the solver layer through the
//! [`ConvexObjective`] trait.
//!
//! Key behaviors
//! -------------
//! - The fit variable represents **increments**; the cumulative matrix is
//!   the documented to-curve transform. Monotonicity is achieved by the
//!   sign flag on this block, never by constraining the curve.
//! - `constrain_zero` adds a [`LinearConstraint`] on the **full** model's
//!   first point (base plus deviation contributions).
//! - Explicit [`VarHandle`]s for the base block and every deviation travel
//!   with the problem; nothing downstream infers variable identity
//!   positionally.
//! - The objective value/gradient use the solver's smoothing epsilon for
//!   L1 terms so the backend's line search stays well-behaved; exact
//!   evaluations are exposed separately for packaging.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated (`SampleSet`, `FilterOptions`,
//!   `LinearDeviationSpec`); assembly itself only checks mapping codomains
//!   because those depend on the grid length.
//! - All matrices are freshly allocated per call; nothing is shared or
//!   cached across invocations.
use crate::filtering::{
    core::{
        cumulative_matrix,
        deviations::LinearDeviationSpec,
        loss::RobustLoss,
        options::FilterOptions,
        regularization::{
            build_regularization, DerivOrder, LinearOperand, RegularizationTerm,
        },
        samples::SampleSet,
        variables::{VarHandle, VariableLayout},
    },
    errors::FilterResult,
};
use crate::optimization::{
    convex::{ConstraintSet, ConvexObjective, LinearConstraint, Theta},
    errors::{SolveResult, SolverError},
};
use ndarray::{Array1, Array2};

/// One declared deviation variable with its mapping into the model.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationVar {
    /// Spec name, reused for the term tag and diagnostics.
    pub name: String,
    /// The declared variable block.
    pub handle: VarHandle,
    /// n×n_vars mapping matrix (one-hot rows unless soft-assigned).
    pub mapping: Array2<f64>,
}

/// Additive linear model: a sum of `matrix · θ[var]` pieces.
///
/// The first piece is always the cumulative matrix over the increment
/// block (the base model); deviations append theirs in spec order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelExpr {
    pieces: Vec<(Array2<f64>, VarHandle)>,
    rows: usize,
}

impl ModelExpr {
    fn new(rows: usize) -> Self {
        Self { pieces: Vec::new(), rows }
    }

    fn push(&mut self, matrix: Array2<f64>, var: VarHandle) {
        self.pieces.push((matrix, var));
    }

    /// Evaluate the model at a stacked point.
    pub fn eval(&self, layout: &VariableLayout, theta: &Array1<f64>) -> Array1<f64> {
        let mut out = Array1::zeros(self.rows);
        for (matrix, var) in &self.pieces {
            out += &matrix.dot(&layout.owned(theta, *var));
        }
        out
    }

    /// Accumulate `Mᵀ d` into each piece's block of `grad`, chaining a
    /// model-space gradient back onto the stacked variables.
    pub fn accumulate_grad(
        &self, layout: &VariableLayout, d_model: &Array1<f64>, grad: &mut Array1<f64>,
    ) {
        for (matrix, var) in &self.pieces {
            let block_grad = matrix.t().dot(d_model);
            let mut target = grad.slice_mut(ndarray::s![layout.range(*var)]);
            target += &block_grad;
        }
    }

    /// Coefficient row of the model's first point over the stacked vector,
    /// used to build the zero-at-origin equality.
    pub fn first_point_row(&self, layout: &VariableLayout) -> Array1<f64> {
        let mut row = Array1::zeros(layout.dim());
        for (matrix, var) in &self.pieces {
            let mut target = row.slice_mut(ndarray::s![layout.range(*var)]);
            target += &matrix.row(0);
        }
        row
    }
}

/// `TrendFilterProblem` — the assembled convex program for one call.
///
/// Owns the variable layout with its explicit handles, the robust loss,
/// the full model expression, the ordered regularization terms, and the
/// constraint set. Implements [`ConvexObjective`] so any `Solver` can
/// consume it.
#[derive(Debug, Clone)]
pub struct TrendFilterProblem {
    layout: VariableLayout,
    base: VarHandle,
    deviations: Vec<DeviationVar>,
    loss: RobustLoss,
    model: ModelExpr,
    cumulative: Array2<f64>,
    terms: Vec<RegularizationTerm>,
    constraints: ConstraintSet,
    smoothing: f64,
}

impl TrendFilterProblem {
    /// The variable layout (explicit handles for every block).
    pub fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    /// Handle of the base increment variable.
    pub fn base_handle(&self) -> VarHandle {
        self.base
    }

    /// Declared deviation variables, in spec order.
    pub fn deviations(&self) -> &[DeviationVar] {
        &self.deviations
    }

    /// The ordered, tagged regularization terms.
    pub fn terms(&self) -> &[RegularizationTerm] {
        &self.terms
    }

    /// The constraint set handed to the solver.
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// The robust data-fit term.
    pub fn loss(&self) -> &RobustLoss {
        &self.loss
    }

    /// Solved increments for a stacked point.
    pub fn increments(&self, theta: &Array1<f64>) -> Array1<f64> {
        self.layout.owned(theta, self.base)
    }

    /// Base model curve `C · v` at a stacked point.
    pub fn base_curve(&self, theta: &Array1<f64>) -> Array1<f64> {
        self.cumulative.dot(&self.increments(theta))
    }

    /// Full model (base plus deviation contributions) at a stacked point.
    pub fn full_model(&self, theta: &Array1<f64>) -> Array1<f64> {
        self.model.eval(&self.layout, theta)
    }

    /// Exact data-fit value at a stacked point.
    pub fn loss_value(&self, theta: &Array1<f64>) -> f64 {
        self.loss.value(&self.full_model(theta))
    }

    /// Exact value of every regularization term at a stacked point, in
    /// term order.
    pub fn term_values(&self, theta: &Array1<f64>) -> Vec<f64> {
        self.terms.iter().map(|t| t.value_at(&self.layout, theta)).collect()
    }

    /// Warm start: increment differences of y (so the base curve starts at
    /// the data), floored into the admissible region when the increment
    /// block is sign-constrained; deviation variables start at zero.
    pub fn initial_point(&self) -> Theta {
        let mut theta = Array1::zeros(self.layout.dim());
        let y = &self.loss.y;
        let range = self.layout.range(self.base);
        let nonneg = self.layout.block(self.base).nonneg;
        let mut prev = 0.0;
        for (slot, &yi) in theta.slice_mut(ndarray::s![range]).iter_mut().zip(y.iter()) {
            let mut increment = yi - prev;
            if nonneg {
                increment = increment.max(1e-6);
            }
            *slot = increment;
            prev += increment;
        }
        theta
    }
}

impl ConvexObjective for TrendFilterProblem {
    fn dim(&self) -> usize {
        self.layout.dim()
    }

    fn value(&self, theta: &Theta) -> SolveResult<f64> {
        if theta.len() != self.layout.dim() {
            return Err(SolverError::ThetaDimMismatch {
                expected: self.layout.dim(),
                found: theta.len(),
            });
        }
        let mut total = self.loss_value(theta);
        for term in &self.terms {
            total += term.smoothed_value_at(&self.layout, theta, self.smoothing);
        }
        Ok(total)
    }

    fn grad(&self, theta: &Theta) -> SolveResult<Array1<f64>> {
        if theta.len() != self.layout.dim() {
            return Err(SolverError::ThetaDimMismatch {
                expected: self.layout.dim(),
                found: theta.len(),
            });
        }
        let model = self.full_model(theta);
        let d_model = self.loss.grad_wrt_model(&model);
        let mut grad = Array1::zeros(self.layout.dim());
        self.model.accumulate_grad(&self.layout, &d_model, &mut grad);
        for term in &self.terms {
            term.accumulate_grad(&self.layout, theta, self.smoothing, &mut grad);
        }
        Ok(grad)
    }
}

/// Assemble a [`TrendFilterProblem`] from validated samples and options.
///
/// Declaration order is fixed: the increment block first, then one block
/// per deviation spec in the order supplied. Regularization terms follow
/// the same order (alpha_0/1/2, then one shrinkage term per deviation).
///
/// # Errors
/// Propagates mapping-matrix errors from the deviation specs
/// (codomain/coverage/shape checks, which depend on the grid length).
pub fn assemble(samples: &SampleSet, opts: &FilterOptions) -> FilterResult<TrendFilterProblem> {
    let n = samples.len();
    let mut layout = VariableLayout::new();
    let base = layout.declare("increments", n, opts.monotonic);

    let cumulative = cumulative_matrix(n);
    let mut model = ModelExpr::new(n);
    model.push(cumulative.clone(), base);

    let mut terms =
        build_regularization(&samples.x, base, opts.norm, opts.alpha_0, opts.alpha_1, opts.alpha_2);

    let mut deviations = Vec::with_capacity(opts.linear_deviations.len());
    for spec in &opts.linear_deviations {
        let (deviation, term) =
            declare_deviation(&mut layout, &mut model, spec, samples, opts.norm)?;
        deviations.push(deviation);
        terms.push(term);
    }

    let loss = RobustLoss::new(samples.y.clone(), &samples.y_err);

    let mut constraints = ConstraintSet { nonneg: layout.nonneg_mask(), equalities: Vec::new() };
    if opts.constrain_zero {
        constraints.equalities.push(LinearConstraint::new(
            "model[0] == 0",
            model.first_point_row(&layout),
            0.0,
        ));
    }

    Ok(TrendFilterProblem {
        layout,
        base,
        deviations,
        loss,
        model,
        cumulative,
        terms,
        constraints,
        smoothing: opts.solver.smoothing,
    })
}

/// Declare one deviation: its variable block, its model contribution, and
/// its shrinkage term (the spec's own alpha under the global norm).
fn declare_deviation(
    layout: &mut VariableLayout, model: &mut ModelExpr, spec: &LinearDeviationSpec,
    samples: &SampleSet, norm: crate::filtering::core::regularization::NormKind,
) -> FilterResult<(DeviationVar, RegularizationTerm)> {
    let mapping = spec.mapping_matrix(&samples.x)?;
    let handle = layout.declare(spec.name.clone(), spec.n_vars, false);
    model.push(mapping.clone(), handle);
    let term = RegularizationTerm {
        name: spec.name.clone(),
        order: DerivOrder::Zero,
        norm,
        weight: spec.alpha,
        operand: LinearOperand { matrix: Array2::eye(spec.n_vars), var: handle },
    };
    Ok((DeviationVar { name: spec.name.clone(), handle, mapping }, term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::core::{
        deviations::DeviationMapping, regularization::NormKind,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Layout and term ordering for problems with and without deviations.
    // - Full-model evaluation against hand-computed curves.
    // - Objective/gradient consistency through finite differences.
    // - The zero-at-origin constraint row over base and deviation blocks.
    // - The warm start's exact-interpolation property.
    // -------------------------------------------------------------------------

    fn samples() -> SampleSet {
        SampleSet::new(
            array![0.0, 1.0, 2.0, 4.0],
            array![1.0, 2.0, 1.5, 3.0],
            None,
        )
        .expect("valid samples")
    }

    fn seasonal_spec(alpha: f64) -> LinearDeviationSpec {
        LinearDeviationSpec::new(
            "seasonal",
            2,
            alpha,
            DeviationMapping::PerSample(vec![0, 1, 0, 1]),
        )
        .expect("valid spec")
    }

    #[test]
    // Purpose
    // -------
    // Verify assembly declares blocks and terms in the documented order.
    //
    // Given
    // -----
    // - Four samples and one 2-category deviation spec.
    //
    // Expect
    // ------
    // - dim = 4 + 2; terms alpha_0/1/2 then "seasonal"; the deviation
    //   handle resolves to the trailing block.
    fn assembly_orders_blocks_and_terms() {
        // Arrange
        let mut opts = FilterOptions::default();
        opts.linear_deviations = vec![seasonal_spec(0.1)];

        // Act
        let problem = assemble(&samples(), &opts).expect("assembly should succeed");

        // Assert
        assert_eq!(problem.dim(), 6);
        let names: Vec<&str> = problem.terms().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha_0", "alpha_1", "alpha_2", "seasonal"]);
        assert_eq!(problem.deviations().len(), 1);
        let handle = problem.deviations()[0].handle;
        assert_eq!(problem.layout().range(handle), 4..6);
    }

    #[test]
    // Purpose
    // -------
    // Check the full model equals base curve plus mapped offsets.
    //
    // Given
    // -----
    // - Increments (1, 1, −0.5, 1.5) and offsets (10, 20) mapped
    //   alternately.
    //
    // Expect
    // ------
    // - model = cumsum + (10, 20, 10, 20) elementwise.
    fn full_model_adds_deviation_contributions() {
        // Arrange
        let mut opts = FilterOptions::default();
        opts.linear_deviations = vec![seasonal_spec(0.0)];
        let problem = assemble(&samples(), &opts).expect("assembly should succeed");
        let theta = array![1.0, 1.0, -0.5, 1.5, 10.0, 20.0];

        // Act
        let base = problem.base_curve(&theta);
        let full = problem.full_model(&theta);

        // Assert
        assert_eq!(base, array![1.0, 2.0, 1.5, 3.0]);
        assert_eq!(full, array![11.0, 22.0, 11.5, 23.0]);
    }

    #[test]
    // Purpose
    // -------
    // Validate the analytic objective gradient against central
    // differences, covering the loss, an L1 derivative term, and a
    // deviation shrinkage term at once.
    //
    // Given
    // -----
    // - L1 norm with alpha_1 = 0.7, alpha_2 = 1.3, a deviation with
    //   alpha = 0.4, and a generic point.
    //
    // Expect
    // ------
    // - Gradient entries within 1e-5 of finite differences.
    fn objective_gradient_matches_finite_difference() {
        // Arrange
        let mut opts = FilterOptions::default();
        opts.norm = NormKind::L1;
        opts.alpha_1 = 0.7;
        opts.alpha_2 = 1.3;
        opts.linear_deviations = vec![seasonal_spec(0.4)];
        let problem = assemble(&samples(), &opts).expect("assembly should succeed");
        let theta = array![0.8, 0.3, -0.4, 1.2, 0.6, -0.9];

        // Act
        let g = problem.grad(&theta).expect("gradient should evaluate");

        // Assert
        let h = 1e-7;
        for i in 0..theta.len() {
            let mut up = theta.clone();
            let mut dn = theta.clone();
            up[i] += h;
            dn[i] -= h;
            let fd = (problem.value(&up).unwrap() - problem.value(&dn).unwrap()) / (2.0 * h);
            assert_relative_eq!(g[i], fd, epsilon = 1e-5, max_relative = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the zero-at-origin equality row covers the full model's
    // first point: the first increment and the first sample's category.
    //
    // Given
    // -----
    // - `constrain_zero` with one deviation mapping sample 0 → category 0.
    //
    // Expect
    // ------
    // - Row (1, 0, 0, 0, 1, 0) with rhs 0, labeled "model[0] == 0".
    fn constrain_zero_targets_full_model_first_point() {
        // Arrange
        let mut opts = FilterOptions::default();
        opts.constrain_zero = true;
        opts.linear_deviations = vec![seasonal_spec(0.1)];

        // Act
        let problem = assemble(&samples(), &opts).expect("assembly should succeed");

        // Assert
        let eqs = &problem.constraints().equalities;
        assert_eq!(eqs.len(), 1);
        assert_eq!(eqs[0].label, "model[0] == 0");
        assert_eq!(eqs[0].rhs, 0.0);
        assert_eq!(eqs[0].coeffs, array![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // Confirm monotonic assembly flags exactly the increment block and
    // the warm start reproduces y through the cumulative transform.
    //
    // Given
    // -----
    // - A monotonic problem (y here happens not to be monotone, so the
    //   warm start floors the negative increment).
    //
    // Expect
    // ------
    // - Mask true on the first n entries only; unconstrained warm start
    //   reproduces y exactly.
    fn monotonic_mask_and_warm_start() {
        // Arrange
        let mut mono_opts = FilterOptions::default();
        mono_opts.monotonic = true;
        let mono = assemble(&samples(), &mono_opts).expect("assembly should succeed");
        let free = assemble(&samples(), &FilterOptions::default()).expect("assembly");

        // Act
        let theta0 = free.initial_point();
        let curve0 = free.base_curve(&theta0);
        let mono_theta0 = mono.initial_point();

        // Assert
        assert_eq!(mono.constraints().nonneg, vec![true, true, true, true]);
        for (c, y) in curve0.iter().zip(samples().y.iter()) {
            assert_relative_eq!(c, y, epsilon = 1e-12);
        }
        assert!(mono_theta0.iter().all(|&v| v >= 1e-6), "monotone warm start stays admissible");
    }
}
