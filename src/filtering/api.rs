//! High-level entry points for trend filtering.
//!
//! This validates nothing itself: samples and options arrive as validated
//! types, assembly performs the grid-dependent deviation checks, and the
//! solve is delegated to the collaborator — the default argmin-backed
//! [`LbfgsSolver`] for [`trend_filter`], or any caller-supplied [`Solver`]
//! for [`trend_filter_with`] (stub solvers included).
use crate::filtering::{
    core::{options::FilterOptions, samples::SampleSet},
    errors::FilterResult,
    model::{assembler::assemble, result::package, result::TrendFilterFit},
};
use crate::optimization::convex::{LbfgsSolver, Solver};

/// Fit a trend filter with the default solver collaborator.
///
/// # Behavior
/// - Assembles the convex program from `samples` and `opts` (robust loss,
///   ordered regularization terms, optional constraints, explicit variable
///   handles).
/// - Builds an [`LbfgsSolver`] from `opts.solver` and runs one solve from
///   the warm start.
/// - Packages the solved values into a [`TrendFilterFit`].
///
/// # Errors
/// - Any formulation validation error (deviation mapping checks happen
///   here because they depend on the grid length).
/// - [`FilterError::Solve`](crate::filtering::errors::FilterError::Solve)
///   when the collaborator reports failure; no values are returned in that
///   case.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use trendfilter::filtering::{
///     api::trend_filter, core::options::FilterOptions, core::samples::SampleSet,
/// };
///
/// let samples = SampleSet::new(
///     array![0.0, 1.0, 2.0, 3.0],
///     array![0.1, 1.2, 1.9, 3.1],
///     None,
/// )?;
/// let mut opts = FilterOptions::default();
/// opts.alpha_2 = 2.0;
/// let fit = trend_filter(&samples, &opts)?;
/// println!("objective = {}", fit.objective_total);
/// # Ok::<(), trendfilter::filtering::errors::FilterError>(())
/// ```
pub fn trend_filter(samples: &SampleSet, opts: &FilterOptions) -> FilterResult<TrendFilterFit> {
    let solver = LbfgsSolver::new(opts.solver.clone());
    trend_filter_with(samples, opts, &solver)
}

/// Fit a trend filter with an explicit solver collaborator.
///
/// The formulation engine is solver-agnostic: anything implementing
/// [`Solver`] can consume the assembled program, which keeps the whole
/// pipeline testable against stub solvers.
pub fn trend_filter_with<S: Solver>(
    samples: &SampleSet, opts: &FilterOptions, solver: &S,
) -> FilterResult<TrendFilterFit> {
    let problem = assemble(samples, opts)?;
    let theta0 = problem.initial_point();
    let outcome = solver.solve(&problem, problem.constraints(), theta0)?;
    package(samples, &problem, &outcome)
}
