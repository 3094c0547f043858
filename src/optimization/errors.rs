use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for solver-layer operations.
pub type SolveResult<T> = Result<T, SolverError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match variable dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- SolverOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    /// Equality-penalty weight must be finite and strictly positive.
    InvalidPenaltyWeight {
        value: f64,
        reason: &'static str,
    },

    /// L1 smoothing epsilon must be finite and non-negative.
    InvalidSmoothing {
        value: f64,
        reason: &'static str,
    },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    /// Initial point length does not match the objective dimension.
    ThetaDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Initial point entries must be finite.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    // ---- Constraints ----
    /// Non-negativity mask length does not match the objective dimension.
    NonNegMaskDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Equality-constraint coefficient row does not match the objective dimension.
    ConstraintDimMismatch {
        label: String,
        expected: usize,
        found: usize,
    },

    /// Equality-constraint coefficients and rhs must be finite.
    NonFiniteConstraint {
        label: String,
        value: f64,
    },

    // ---- Solver outcome ----
    /// Solved variable values must be finite.
    InvalidSolution {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Solution vector is missing (solver reported no best parameter).
    MissingSolution,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for SolverError {}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            SolverError::GradientNotImplemented => {
                write!(f, "Gradient not implemented for this objective")
            }
            SolverError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            SolverError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- SolverOptions ----
            SolverError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            SolverError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost change tolerance {tol}: {reason}")
            }
            SolverError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            SolverError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            SolverError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            SolverError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            SolverError::InvalidPenaltyWeight { value, reason } => {
                write!(f, "Invalid penalty weight {value}: {reason}")
            }
            SolverError::InvalidSmoothing { value, reason } => {
                write!(f, "Invalid smoothing epsilon {value}: {reason}")
            }

            // ---- Objective ----
            SolverError::NonFiniteCost { value } => {
                write!(f, "Non-finite objective value: {value}")
            }
            SolverError::ThetaDimMismatch { expected, found } => {
                write!(f, "Initial point dimension mismatch: expected {expected}, found {found}")
            }
            SolverError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid initial point at index {index}: {value}, must be finite")
            }

            // ---- Constraints ----
            SolverError::NonNegMaskDimMismatch { expected, found } => {
                write!(
                    f,
                    "Non-negativity mask dimension mismatch: expected {expected}, found {found}"
                )
            }
            SolverError::ConstraintDimMismatch { label, expected, found } => {
                write!(
                    f,
                    "Constraint '{label}' dimension mismatch: expected {expected}, found {found}"
                )
            }
            SolverError::NonFiniteConstraint { label, value } => {
                write!(f, "Constraint '{label}' has non-finite entry: {value}")
            }

            // ---- Solver outcome ----
            SolverError::InvalidSolution { index, value, reason } => {
                write!(f, "Invalid solved value at index {index}: {value}: {reason}")
            }
            SolverError::MissingSolution => {
                write!(f, "Missing solution vector (solver returned no best parameter)")
            }

            // ---- Argmin ----
            SolverError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            SolverError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            SolverError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            SolverError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            SolverError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            SolverError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            SolverError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            SolverError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            SolverError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for SolverError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(solver_err) => match solver_err {
                ArgminError::InvalidParameter { text } => SolverError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => SolverError::NotImplemented { text },
                ArgminError::NotInitialized { text } => SolverError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => SolverError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => SolverError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => SolverError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => SolverError::ImpossibleError { text },
                _ => SolverError::UnknownError,
            },
            Err(err) => SolverError::BackendError { text: err.to_string() },
        }
    }
}
