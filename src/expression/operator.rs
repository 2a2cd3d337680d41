//! Operation tags for internal operator nodes.

use crate::symbol::PartitionBy;
use crate::types::PhysicalType;
use std::cmp::Ordering;
use std::fmt;

/// Binary operations supported by operator nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
}

impl BinaryOperator {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Lt
                | BinaryOperator::Le
                | BinaryOperator::Gt
                | BinaryOperator::Ge
        )
    }

    /// Get the declared result type of this operator given operand types
    pub fn output_type(&self, left: PhysicalType, right: PhysicalType) -> Option<PhysicalType> {
        use PhysicalType::*;

        if self.is_arithmetic() {
            return match (left, right) {
                (Date, r) if r.is_integer() => {
                    matches!(self, BinaryOperator::Add | BinaryOperator::Sub).then_some(Date)
                }
                (l, Date) if l.is_integer() => (*self == BinaryOperator::Add).then_some(Date),
                (Date, Date) => (*self == BinaryOperator::Sub).then_some(Int64),
                (l, r) => {
                    let rank = l.numeric_rank()?.max(r.numeric_rank()?);
                    [Int32, Int64, Float64].get(usize::from(rank)).copied()
                }
            };
        }

        if self.is_comparison() {
            comparison_domain(left, right)?;
            return Some(Bool);
        }

        // And / Or
        (left == Bool && right == Bool).then_some(Bool)
    }

    /// Whether a comparison holds for the given ordering of left to right.
    pub(crate) fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            BinaryOperator::Eq => ordering == Ordering::Equal,
            BinaryOperator::Ne => ordering != Ordering::Equal,
            BinaryOperator::Lt => ordering == Ordering::Less,
            BinaryOperator::Le => ordering != Ordering::Greater,
            BinaryOperator::Gt => ordering == Ordering::Greater,
            BinaryOperator::Ge => ordering != Ordering::Less,
            _ => false,
        }
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }

    /// Parse an operator from its symbol or lowercase name (`+` or `add`)
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name.to_ascii_lowercase().as_str() {
            "+" | "add" => BinaryOperator::Add,
            "-" | "sub" => BinaryOperator::Sub,
            "*" | "mul" => BinaryOperator::Mul,
            "/" | "div" => BinaryOperator::Div,
            "=" | "eq" => BinaryOperator::Eq,
            "!=" | "<>" | "ne" => BinaryOperator::Ne,
            "<" | "lt" => BinaryOperator::Lt,
            "<=" | "le" => BinaryOperator::Le,
            ">" | "gt" => BinaryOperator::Gt,
            ">=" | "ge" => BinaryOperator::Ge,
            "and" => BinaryOperator::And,
            "or" => BinaryOperator::Or,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value domain two operands are compared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComparisonDomain {
    Integer,
    Float,
    Bool,
    Text,
    /// Raw dictionary codes, for symbol operands with no table to resolve
    /// them through.
    SymbolCode,
}

/// Domain chosen from the declared types alone. Symbols start out as
/// text; `Operator::comparison_domain` narrows that once the operands are
/// known.
pub(crate) fn comparison_domain(
    left: PhysicalType,
    right: PhysicalType,
) -> Option<ComparisonDomain> {
    use PhysicalType::*;

    match (left, right) {
        (Float64, r) if r.is_numeric() => Some(ComparisonDomain::Float),
        (l, Float64) if l.is_numeric() => Some(ComparisonDomain::Float),
        (l, r) if l.is_integer() && r.is_integer() => Some(ComparisonDomain::Integer),
        (Date, Date) => Some(ComparisonDomain::Integer),
        (Bool, Bool) => Some(ComparisonDomain::Bool),
        (String | Symbol, String | Symbol) => Some(ComparisonDomain::Text),
        _ => None,
    }
}

/// Unary operations supported by operator nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Neg,
    Not,
    IsNull,
    IsNotNull,
    /// Truncate a timestamp to the start of its partition.
    Floor(PartitionBy),
}

impl UnaryOperator {
    /// Get the declared result type of this operator given the operand type
    pub fn output_type(&self, operand: PhysicalType) -> Option<PhysicalType> {
        match self {
            UnaryOperator::Neg => operand.is_numeric().then_some(operand),
            UnaryOperator::Not => (operand == PhysicalType::Bool).then_some(PhysicalType::Bool),
            // NULL checks accept any type
            UnaryOperator::IsNull | UnaryOperator::IsNotNull => Some(PhysicalType::Bool),
            UnaryOperator::Floor(_) => {
                (operand == PhysicalType::Date).then_some(PhysicalType::Date)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Neg => "-",
            UnaryOperator::Not => "NOT",
            UnaryOperator::IsNull => "IS NULL",
            UnaryOperator::IsNotNull => "IS NOT NULL",
            UnaryOperator::Floor(_) => "FLOOR",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Floor(scheme) => write!(f, "FLOOR({})", scheme),
            other => f.write_str(other.as_str()),
        }
    }
}
