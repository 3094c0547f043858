//! convex::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the L-BFGS backends used by the
//! default convex solver. These helpers hide Argmin's generic wiring and
//! apply crate-level options (tolerances, memory size) so that higher-level
//! code can request a configured solver without touching Argmin-specific
//! types.
//!
//! Conventions
//! -----------
//! - All solvers operate on the canonical numeric types [`Theta`], [`Grad`],
//!   and [`Cost`] as defined in [`super::types`].
//! - The L-BFGS memory (`m`) is either provided via `opts.lbfgs_mem` or
//!   defaults to [`DEFAULT_LBFGS_MEM`].
//! - The builders do **not** set an initial parameter vector or `max_iters`;
//!   these are runtime concerns applied by the runner.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    convex::{
        traits::SolverOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
    errors::SolveResult,
};

/// Construct L-BFGS with Hager–Zhang line search.
///
/// Consults `opts.lbfgs_mem` (falling back to [`DEFAULT_LBFGS_MEM`]) and
/// wires the optional gradient/cost tolerances from `opts.tols`.
///
/// # Errors
/// `SolverError` (via `From<argmin::core::Error>`) when Argmin rejects a
/// tolerance setting.
pub fn build_lbfgs_hager_zhang(opts: &SolverOptions) -> SolveResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search.
///
/// Consults `opts.lbfgs_mem` (falling back to [`DEFAULT_LBFGS_MEM`]) and
/// wires the optional gradient/cost tolerances from `opts.tols`.
///
/// # Errors
/// `SolverError` (via `From<argmin::core::Error>`) when Argmin rejects a
/// tolerance setting.
pub fn build_lbfgs_more_thuente(opts: &SolverOptions) -> SolveResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional tolerances to an L-BFGS solver.
///
/// Generic over the line-search type so both builders share the wiring.
/// When a tolerance is `None`, the corresponding `with_tolerance_*` method
/// is not called and Argmin's defaults remain in effect.
///
/// # Errors
/// `SolverError` (via `From<argmin::core::Error>`) when
/// `with_tolerance_grad` or `with_tolerance_cost` rejects a value.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &SolverOptions,
) -> SolveResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::convex::traits::{LineSearcher, SolverOptions, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Basic construction of L-BFGS solvers with Hager–Zhang and
    //   More–Thuente line searches.
    // - Propagation of `lbfgs_mem` (Some vs None) into the builder paths.
    // - Application of gradient and cost tolerances via `configure_lbfgs`.
    //
    // They intentionally DO NOT cover:
    // - End-to-end executor behavior (`run_lbfgs`), which is tested in the
    //   runner layer.
    // -------------------------------------------------------------------------

    fn opts_with(line_searcher: LineSearcher, lbfgs_mem: Option<usize>) -> SolverOptions {
        let tols =
            Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).expect("Tolerances should be valid");
        SolverOptions::new(tols, line_searcher, lbfgs_mem, false, 1e8, 1e-9)
            .expect("SolverOptions should be valid")
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `build_lbfgs_hager_zhang` succeeds and uses the crate
    // default L-BFGS memory when `opts.lbfgs_mem` is `None`.
    //
    // Given
    // -----
    // - Valid options with `line_searcher = HagerZhang`, `lbfgs_mem = None`.
    //
    // Expect
    // ------
    // - `build_lbfgs_hager_zhang` returns `Ok(_)` and does not panic.
    fn build_lbfgs_hager_zhang_uses_default_memory_when_none() {
        // Arrange
        let opts = opts_with(LineSearcher::HagerZhang, None);

        // Act
        let solver = build_lbfgs_hager_zhang(&opts);

        // Assert
        assert!(
            solver.is_ok(),
            "Builder should succeed when lbfgs_mem is None and tolerances are valid"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that an explicit L-BFGS memory value is accepted.
    //
    // Given
    // -----
    // - Valid options with `lbfgs_mem = Some(11)`.
    //
    // Expect
    // ------
    // - `build_lbfgs_hager_zhang` returns `Ok(_)`.
    fn build_lbfgs_hager_zhang_respects_explicit_memory() {
        // Arrange
        let opts = opts_with(LineSearcher::HagerZhang, Some(11));

        // Act
        let solver = build_lbfgs_hager_zhang(&opts);

        // Assert
        assert!(solver.is_ok(), "Builder should succeed when lbfgs_mem is explicitly provided");
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `build_lbfgs_more_thuente` succeeds with and without an
    // explicit memory override.
    //
    // Given
    // -----
    // - Valid options with `line_searcher = MoreThuente`.
    //
    // Expect
    // ------
    // - Both builder calls return `Ok(_)`.
    fn build_lbfgs_more_thuente_constructs_solver() {
        // Arrange
        let default_mem = opts_with(LineSearcher::MoreThuente, None);
        let explicit_mem = opts_with(LineSearcher::MoreThuente, Some(9));

        // Act & Assert
        assert!(build_lbfgs_more_thuente(&default_mem).is_ok());
        assert!(build_lbfgs_more_thuente(&explicit_mem).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Confirm that `configure_lbfgs` applies tolerances without error when
    // both are present, and succeeds when both are absent (Argmin defaults).
    //
    // Given
    // -----
    // - L-BFGS instances created with `DEFAULT_LBFGS_MEM`.
    //
    // Expect
    // ------
    // - `configure_lbfgs` returns `Ok(_)` in both configurations.
    fn configure_lbfgs_handles_present_and_absent_tolerances() {
        // Arrange
        let with_tols = opts_with(LineSearcher::HagerZhang, None);
        let raw_a = LBFGS::new(HagerZhangLS::new(), DEFAULT_LBFGS_MEM);

        let tols = Tolerances::new(None, None, Some(50)).expect("Tolerances should be valid");
        let without_tols = SolverOptions::new(tols, LineSearcher::MoreThuente, None, false, 1e8, 0.0)
            .expect("SolverOptions should be valid");
        let raw_b = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);

        // Act & Assert
        assert!(configure_lbfgs(raw_a, &with_tols).is_ok());
        assert!(configure_lbfgs(raw_b, &without_tols).is_ok());
    }
}
