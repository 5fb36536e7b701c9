//! Shape-validation results.
//!
//! Validation itself happens elsewhere; this crate gives its output a typed
//! shape and defines the [`Validator`] seam the package loader calls through.

pub mod error;
mod result;
mod validator;

pub use crate::result::{
    EachOfSolution, EachOfSolutions, Expression, LiteralValue, NodeConstraint, NodeTest, Object, ShapeAndFailure,
    ShapeAndResults, ShapeResult, ShapeTest, TestedTriple, TripleConstraintSolutions, ValidationResult, ValueExpr,
};
pub use crate::validator::{Recorded, Validator};
