//! Typed evaluation of operator trees against a record.
//!
//! Each node answers the accessor matching its declared type. A few
//! widenings are also allowed:
//!
//! | declared | accessors |
//! |---|---|
//! | `Int32` | `get_int32`, `get_int64`, `get_float64` |
//! | `Int64` | `get_int64`, `get_date`, `get_float64` |
//! | `Date` | `get_date`, `get_int64`, `get_float64` |
//! | `Float64` | `get_float64` |
//! | `Bool` | `get_bool` |
//! | `Symbol` | `get_symbol_code`, `get_str` |
//! | `String` | `get_str` |
//!
//! Any other pairing is a planner bug and panics. Widening maps the source
//! sentinel to the target sentinel (NaN for floating results).
//!
//! Integer arithmetic propagates NULL, wraps on overflow and yields NULL on
//! division by zero. The floating view of an integer node re-fetches its
//! operands: `+ - *` widen the integer result, `/` divides as IEEE-754.

use crate::expression::operator::{BinaryOperator, ComparisonDomain, UnaryOperator};
use crate::expression::{Operator, OperatorKind};
use crate::record::Record;
use crate::types::{null, PhysicalType, Value};
use std::cmp::Ordering;

#[inline]
fn widen_int32(v: i32) -> i64 {
    if v == null::INT32 {
        null::INT64
    } else {
        i64::from(v)
    }
}

#[inline]
fn int64_to_float64(v: i64) -> f64 {
    if v == null::INT64 {
        null::FLOAT64
    } else {
        v as f64
    }
}

#[inline]
fn int32_to_float64(v: i32) -> f64 {
    if v == null::INT32 {
        null::FLOAT64
    } else {
        f64::from(v)
    }
}

impl Operator {
    /// Evaluate with the accessor for the declared type, making NULL
    /// explicit in the result.
    pub fn evaluate<R: Record + ?Sized>(&self, rec: &R) -> Value {
        match self.physical_type() {
            PhysicalType::Bool => Value::Bool(self.get_bool(rec)),
            PhysicalType::Int32 => Value::int32(self.get_int32(rec)),
            PhysicalType::Int64 => Value::int64(self.get_int64(rec)),
            PhysicalType::Float64 => Value::float64(self.get_float64(rec)),
            PhysicalType::Date => Value::date(self.get_date(rec)),
            PhysicalType::Symbol => Value::symbol(self.get_symbol_code(rec)),
            PhysicalType::String => Value::string(self.get_str(rec)),
        }
    }

    pub fn get_bool<R: Record + ?Sized>(&self, rec: &R) -> bool {
        if self.physical_type() != PhysicalType::Bool {
            self.unsupported("get_bool");
        }

        match self.kind() {
            OperatorKind::Column(col) => rec.get_bool(col.position),
            OperatorKind::Constant(Value::Bool(b)) => *b,
            OperatorKind::Constant(Value::Null) => null::BOOL,
            OperatorKind::Unary { op, operand } => match op {
                UnaryOperator::Not => !operand.get_bool(rec),
                UnaryOperator::IsNull => operand.is_null_at(rec),
                UnaryOperator::IsNotNull => !operand.is_null_at(rec),
                _ => self.unsupported("get_bool"),
            },
            OperatorKind::Binary { op, left, right } => match op {
                BinaryOperator::And => left.get_bool(rec) && right.get_bool(rec),
                BinaryOperator::Or => left.get_bool(rec) || right.get_bool(rec),
                op if op.is_comparison() => compare(*op, left, right, rec),
                _ => self.unsupported("get_bool"),
            },
            _ => self.unsupported("get_bool"),
        }
    }

    pub fn get_int32<R: Record + ?Sized>(&self, rec: &R) -> i32 {
        if self.physical_type() != PhysicalType::Int32 {
            self.unsupported("get_int32");
        }

        match self.kind() {
            OperatorKind::Column(col) => rec.get_int32(col.position),
            OperatorKind::Constant(Value::Int32(v)) => *v,
            OperatorKind::Constant(Value::Null) => null::INT32,
            OperatorKind::Unary {
                op: UnaryOperator::Neg,
                operand,
            } => {
                let v = operand.get_int32(rec);
                if v == null::INT32 {
                    null::INT32
                } else {
                    v.wrapping_neg()
                }
            }
            OperatorKind::Binary { op, left, right } => {
                let l = left.get_int32(rec);
                let r = right.get_int32(rec);
                if l == null::INT32 || r == null::INT32 {
                    return null::INT32;
                }
                match op {
                    BinaryOperator::Add => l.wrapping_add(r),
                    BinaryOperator::Sub => l.wrapping_sub(r),
                    BinaryOperator::Mul => l.wrapping_mul(r),
                    BinaryOperator::Div if r == 0 => null::INT32,
                    BinaryOperator::Div => l.wrapping_div(r),
                    _ => self.unsupported("get_int32"),
                }
            }
            _ => self.unsupported("get_int32"),
        }
    }

    pub fn get_int64<R: Record + ?Sized>(&self, rec: &R) -> i64 {
        match self.physical_type() {
            PhysicalType::Int64 | PhysicalType::Date => self.int64_native(rec),
            PhysicalType::Int32 => widen_int32(self.get_int32(rec)),
            _ => self.unsupported("get_int64"),
        }
    }

    /// Microseconds since the Unix epoch.
    pub fn get_date<R: Record + ?Sized>(&self, rec: &R) -> i64 {
        match self.physical_type() {
            PhysicalType::Date | PhysicalType::Int64 => self.int64_native(rec),
            _ => self.unsupported("get_date"),
        }
    }

    pub fn get_float64<R: Record + ?Sized>(&self, rec: &R) -> f64 {
        match self.physical_type() {
            PhysicalType::Float64 => self.float64_native(rec),
            PhysicalType::Int64 | PhysicalType::Date => self.int64_as_float64(rec),
            PhysicalType::Int32 => self.int32_as_float64(rec),
            _ => self.unsupported("get_float64"),
        }
    }

    pub fn get_symbol_code<R: Record + ?Sized>(&self, rec: &R) -> i32 {
        if self.physical_type() != PhysicalType::Symbol {
            self.unsupported("get_symbol_code");
        }

        match self.kind() {
            OperatorKind::Column(col) => rec.get_symbol_code(col.position),
            OperatorKind::Constant(Value::Symbol(code)) => *code,
            OperatorKind::Constant(Value::Null) => null::SYMBOL,
            _ => self.unsupported("get_symbol_code"),
        }
    }

    /// `None` when the value is NULL. Symbol columns resolve their code
    /// through the bound symbol table.
    pub fn get_str<'a, R: Record + ?Sized>(&'a self, rec: &'a R) -> Option<&'a str> {
        match (self.physical_type(), self.kind()) {
            (PhysicalType::String, OperatorKind::Column(col)) => rec.get_str(col.position),
            (PhysicalType::String, OperatorKind::Constant(Value::String(s))) => Some(s.as_str()),
            (PhysicalType::String | PhysicalType::Symbol, OperatorKind::Constant(Value::Null)) => {
                None
            }
            (PhysicalType::Symbol, OperatorKind::Column(col)) => {
                let code = rec.get_symbol_code(col.position);
                match &col.symbols {
                    Some(symbols) => symbols.value(code),
                    None => panic!("No symbol table bound to column {}", col.position),
                }
            }
            _ => self.unsupported("get_str"),
        }
    }

    /// Whether this node evaluates to its type's NULL for `rec`.
    pub fn is_null_at<R: Record + ?Sized>(&self, rec: &R) -> bool {
        match self.physical_type() {
            PhysicalType::Bool => false,
            PhysicalType::Int32 => self.get_int32(rec) == null::INT32,
            PhysicalType::Int64 => self.get_int64(rec) == null::INT64,
            PhysicalType::Date => self.get_date(rec) == null::DATE,
            PhysicalType::Float64 => self.get_float64(rec).is_nan(),
            PhysicalType::Symbol => self.get_symbol_code(rec) == null::SYMBOL,
            PhysicalType::String => self.get_str(rec).is_none(),
        }
    }

    /// Int64/Date nodes computed in their own domain.
    fn int64_native<R: Record + ?Sized>(&self, rec: &R) -> i64 {
        match self.kind() {
            OperatorKind::Column(col) if self.physical_type() == PhysicalType::Date => {
                rec.get_date(col.position)
            }
            OperatorKind::Column(col) => rec.get_int64(col.position),
            OperatorKind::Constant(Value::Int64(v) | Value::Date(v)) => *v,
            OperatorKind::Constant(Value::Null) => null::INT64,
            OperatorKind::Unary { op, operand } => match op {
                UnaryOperator::Neg => {
                    let v = operand.get_int64(rec);
                    if v == null::INT64 {
                        null::INT64
                    } else {
                        v.wrapping_neg()
                    }
                }
                UnaryOperator::Floor(scheme) => scheme.floor(operand.get_date(rec)),
                _ => self.unsupported("get_int64"),
            },
            OperatorKind::Binary { op, left, right } => {
                let l = left.get_int64(rec);
                let r = right.get_int64(rec);
                if l == null::INT64 || r == null::INT64 {
                    return null::INT64;
                }
                match op {
                    BinaryOperator::Add => l.wrapping_add(r),
                    BinaryOperator::Sub => l.wrapping_sub(r),
                    BinaryOperator::Mul => l.wrapping_mul(r),
                    BinaryOperator::Div if r == 0 => null::INT64,
                    BinaryOperator::Div => l.wrapping_div(r),
                    _ => self.unsupported("get_int64"),
                }
            }
            _ => self.unsupported("get_int64"),
        }
    }

    fn int64_as_float64<R: Record + ?Sized>(&self, rec: &R) -> f64 {
        let OperatorKind::Binary { op, left, right } = self.kind() else {
            return int64_to_float64(self.int64_native(rec));
        };

        let l = left.get_int64(rec);
        let r = right.get_int64(rec);
        if l == null::INT64 || r == null::INT64 {
            return null::FLOAT64;
        }
        match op {
            BinaryOperator::Add => l.wrapping_add(r) as f64,
            BinaryOperator::Sub => l.wrapping_sub(r) as f64,
            BinaryOperator::Mul => l.wrapping_mul(r) as f64,
            BinaryOperator::Div => l as f64 / r as f64,
            _ => self.unsupported("get_float64"),
        }
    }

    fn int32_as_float64<R: Record + ?Sized>(&self, rec: &R) -> f64 {
        let OperatorKind::Binary { op, left, right } = self.kind() else {
            return int32_to_float64(self.get_int32(rec));
        };

        let l = left.get_int32(rec);
        let r = right.get_int32(rec);
        if l == null::INT32 || r == null::INT32 {
            return null::FLOAT64;
        }
        match op {
            BinaryOperator::Add => f64::from(l.wrapping_add(r)),
            BinaryOperator::Sub => f64::from(l.wrapping_sub(r)),
            BinaryOperator::Mul => f64::from(l.wrapping_mul(r)),
            BinaryOperator::Div => f64::from(l) / f64::from(r),
            _ => self.unsupported("get_float64"),
        }
    }

    fn float64_native<R: Record + ?Sized>(&self, rec: &R) -> f64 {
        match self.kind() {
            OperatorKind::Column(col) => rec.get_float64(col.position),
            OperatorKind::Constant(Value::Float64(v)) => *v,
            OperatorKind::Constant(Value::Null) => null::FLOAT64,
            OperatorKind::Unary {
                op: UnaryOperator::Neg,
                operand,
            } => -operand.get_float64(rec),
            // NaN propagates through IEEE-754 arithmetic on its own
            OperatorKind::Binary { op, left, right } => {
                let l = left.get_float64(rec);
                let r = right.get_float64(rec);
                match op {
                    BinaryOperator::Add => l + r,
                    BinaryOperator::Sub => l - r,
                    BinaryOperator::Mul => l * r,
                    BinaryOperator::Div => l / r,
                    _ => self.unsupported("get_float64"),
                }
            }
            _ => self.unsupported("get_float64"),
        }
    }

    #[cold]
    fn unsupported(&self, accessor: &str) -> ! {
        panic!(
            "{} is not supported by {} operator {}",
            accessor,
            self.physical_type(),
            self
        )
    }
}

/// Comparisons are false whenever either side is NULL.
fn compare<R: Record + ?Sized>(
    op: BinaryOperator,
    left: &Operator,
    right: &Operator,
    rec: &R,
) -> bool {
    let ordering = match left.comparison_domain(right) {
        Some(ComparisonDomain::Integer) => {
            let l = left.get_int64(rec);
            let r = right.get_int64(rec);
            if l == null::INT64 || r == null::INT64 {
                None
            } else {
                Some(l.cmp(&r))
            }
        }
        // partial_cmp is None for NaN
        Some(ComparisonDomain::Float) => left.get_float64(rec).partial_cmp(&right.get_float64(rec)),
        Some(ComparisonDomain::Bool) => Some(left.get_bool(rec).cmp(&right.get_bool(rec))),
        Some(ComparisonDomain::Text) => match (left.get_str(rec), right.get_str(rec)) {
            (Some(l), Some(r)) => Some(l.cmp(r)),
            _ => None,
        },
        Some(ComparisonDomain::SymbolCode) => {
            let l = left.get_symbol_code(rec);
            let r = right.get_symbol_code(rec);
            if l == null::SYMBOL || r == null::SYMBOL {
                None
            } else {
                Some(l.cmp(&r))
            }
        }
        None => panic!(
            "cannot compare {} with {}",
            left.physical_type(),
            right.physical_type()
        ),
    };

    ordering.is_some_and(|ordering: Ordering| op.accepts(ordering))
}
