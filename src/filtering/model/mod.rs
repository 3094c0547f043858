//! filtering::model — assembly, packaging, and interpolation.
//!
//! Purpose
//! -------
//! Turn validated inputs into a solver-ready [`TrendFilterProblem`]
//! (assembler), and a solved outcome into the caller-facing
//! [`TrendFilterFit`] with its interpolation functions (result,
//! interpolate). This is where the explicit variable handles, the ordered
//! term collection, and the constraint list live.

pub mod assembler;
pub mod interpolate;
pub mod result;

pub use self::assembler::{assemble, DeviationVar, ModelExpr, TrendFilterProblem};
pub use self::interpolate::LinearInterpolator;
pub use self::result::{package, DeviationFit, RegularizationValue, TrendFilterFit};
