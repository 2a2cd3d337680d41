//! Error types for building and checking operator trees.
//!
//! These cover planning-time failures only. Evaluation never returns an
//! error: NULLs travel as sentinels and invariant violations panic.

use crate::types::{PhysicalType, Value};
use thiserror::Error;

/// Errors that can occur while constructing or type checking operators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Type mismatch in {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: PhysicalType,
        actual: PhysicalType,
        context: String,
    },

    #[error("Invalid operand types for operator {operator}: left={left}, right={right:?}")]
    InvalidOperandTypes {
        operator: &'static str,
        left: PhysicalType,
        right: Option<PhysicalType>,
    },

    #[error("Constant {value:?} cannot be declared as {expected}")]
    ConstantTypeMismatch { value: Value, expected: PhysicalType },

    #[error("Column index {index} out of bounds for schema with {size} columns")]
    ColumnIndexOutOfBounds { index: usize, size: usize },

    #[error("No symbol table bound to column {position}")]
    MissingSymbolTable { position: usize },
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;
