//! Execution helper that runs an `argmin` solver on a constrained convex
//! problem and returns the raw backend state for the caller to normalize.
use crate::optimization::{
    convex::{
        adapter::ConstrainedAdapter,
        traits::{ConvexObjective, SolverOptions},
        types::{FnEvalMap, Grad, Theta},
    },
    errors::SolveResult,
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State, TerminationStatus};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Raw state extracted from an `argmin` run, still in **solver space**.
///
/// The caller (the default [`LbfgsSolver`](super::api::LbfgsSolver)) maps
/// `best_param` back through the variable transform and re-evaluates the
/// objective before building a [`SolveOutcome`](super::traits::SolveOutcome).
#[derive(Debug, Clone)]
pub struct RawSolve {
    pub best_param: Option<Theta>,
    pub best_cost: f64,
    pub termination: TerminationStatus,
    pub iterations: u64,
    pub fn_evals: FnEvalMap,
    pub grad: Option<Grad>,
}

/// Run an `argmin` optimization for a constrained convex problem.
///
/// This is the shared runner used by both line-search variants. It wires up:
/// - the adapted problem via [`ConstrainedAdapter`],
/// - the chosen `Solver` (L-BFGS with Hager–Zhang/More–Thuente),
/// - the initial solver-space point `u0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///   then executes the solver and extracts the raw result state.
///
/// # Arguments
/// - `u0`: Initial solver-space point. It is **consumed** and set on the
///   optimizer state via `state.param(u0)`.
/// - `opts`: Solver options (tolerances, verbosity, max iters, etc.).
/// - `problem`: A [`ConstrainedAdapter`] wrapping the objective and its
///   constraint set.
/// - `solver`: A fully constructed backend (e.g. from
///   [`build_lbfgs_hager_zhang`](super::builders::build_lbfgs_hager_zhang)).
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a
/// terminal slog observer is attached with `ObserverMode::Always` and a
/// one-time pre-iteration line logs the initial cost and, if available,
/// the gradient norm.
///
/// # Errors
/// - Propagates any `argmin` runtime error (observer failures, solver
///   errors, line-search failures, etc.) via the crate's
///   `From<argmin::core::Error>` conversion.
pub fn run_lbfgs<'a, O, S>(
    u0: Theta, opts: &SolverOptions, problem: ConstrainedAdapter<'a, O>, solver: S,
) -> SolveResult<RawSolve>
where
    O: ConvexObjective,
    S: argmin::core::Solver<
            ConstrainedAdapter<'a, O>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&u0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(u0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let fn_evals = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    Ok(RawSolve {
        best_param: result.take_best_param(),
        best_cost: result.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    })
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<O>(u0: &Theta, problem: &ConstrainedAdapter<'_, O>) -> SolveResult<()>
where
    O: ConvexObjective,
{
    let c0 = problem.cost(u0)?;
    let g0n = problem.gradient(u0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: cost(u0) = {:.6}{}",
        c0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
