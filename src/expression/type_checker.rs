//! Type checking for operator trees.
//!
//! Trees built with the plain constructors carry whatever type the caller
//! declared. The checker re-derives every node's type bottom-up and rejects
//! trees where a declaration disagrees, before any record is evaluated.

use crate::expression::{ExpressionError, ExpressionResult, Operator, OperatorKind};
use crate::types::PhysicalType;

/// Type checker for operator trees
pub struct TypeChecker<'a> {
    /// Types of the input columns, when known
    schema: Option<&'a [PhysicalType]>,
}

impl<'a> TypeChecker<'a> {
    /// Create a type checker that trusts column declarations
    pub fn new() -> Self {
        Self { schema: None }
    }

    /// Create a type checker that also validates columns against a schema
    pub fn with_schema(schema: &'a [PhysicalType]) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    /// Type check an operator tree and return its result type
    pub fn check(&self, operator: &Operator) -> ExpressionResult<PhysicalType> {
        let declared = operator.physical_type();

        let inferred = match operator.kind() {
            OperatorKind::Column(col) => {
                if let Some(schema) = self.schema {
                    match schema.get(col.position) {
                        Some(ty) => *ty,
                        None => {
                            return Err(ExpressionError::ColumnIndexOutOfBounds {
                                index: col.position,
                                size: schema.len(),
                            })
                        }
                    }
                } else {
                    declared
                }
            }

            OperatorKind::Constant(value) => {
                if !value.is_compatible_with(declared) {
                    return Err(ExpressionError::ConstantTypeMismatch {
                        value: value.clone(),
                        expected: declared,
                    });
                }
                declared
            }

            OperatorKind::Unary { op, operand } => {
                let operand_type = self.check(operand)?;
                op.output_type(operand_type)
                    .ok_or(ExpressionError::InvalidOperandTypes {
                        operator: op.as_str(),
                        left: operand_type,
                        right: None,
                    })?
            }

            OperatorKind::Binary { op, left, right } => {
                let left_type = self.check(left)?;
                let right_type = self.check(right)?;
                op.output_type(left_type, right_type)
                    .filter(|_| !op.is_comparison() || left.comparison_domain(right).is_some())
                    .ok_or(ExpressionError::InvalidOperandTypes {
                        operator: op.as_str(),
                        left: left_type,
                        right: Some(right_type),
                    })?
            }
        };

        if inferred != declared {
            log::debug!("operator {} declared {} but computes {}", operator, declared, inferred);
            return Err(ExpressionError::TypeMismatch {
                expected: inferred,
                actual: declared,
                context: format!("declaration of {}", operator),
            });
        }

        Ok(declared)
    }

    /// Check if an operator tree is valid as a filter predicate
    pub fn check_filter_predicate(&self, operator: &Operator) -> ExpressionResult<()> {
        match self.check(operator)? {
            PhysicalType::Bool => Ok(()),
            other => Err(ExpressionError::TypeMismatch {
                expected: PhysicalType::Bool,
                actual: other,
                context: "filter predicate".to_string(),
            }),
        }
    }
}

impl Default for TypeChecker<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to type check an operator tree
pub fn type_check_operator(
    operator: &Operator,
    schema: &[PhysicalType],
) -> ExpressionResult<PhysicalType> {
    TypeChecker::with_schema(schema).check(operator)
}

/// Helper function to validate a filter predicate
pub fn validate_filter_predicate(
    operator: &Operator,
    schema: &[PhysicalType],
) -> ExpressionResult<()> {
    TypeChecker::with_schema(schema).check_filter_predicate(operator)
}
