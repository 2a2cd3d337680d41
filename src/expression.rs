//! Operator trees for computing derived values per record.
//!
//! This module provides:
//! - Operator tree representation with a declared physical type per node
//! - Typed accessors evaluating a tree against a `Record`
//! - Type inference and checking for planners building trees
//! - Constant folding

pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;
pub mod type_checker;

pub use error::{ExpressionError, ExpressionResult};
pub use expr::{ColumnRef, Operator, OperatorKind};
pub use operator::{BinaryOperator, UnaryOperator};
pub use type_checker::{type_check_operator, validate_filter_predicate, TypeChecker};
