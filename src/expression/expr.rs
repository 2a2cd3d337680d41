//! Operator tree definitions.

use crate::expression::operator::{
    comparison_domain, BinaryOperator, ComparisonDomain, UnaryOperator,
};
use crate::expression::{ExpressionError, ExpressionResult};
use crate::record::EmptyRecord;
use crate::symbol::SymbolTableRef;
use crate::types::{PhysicalType, Value};
use std::fmt;

/// Column reference in an operator tree
#[derive(Clone)]
pub struct ColumnRef {
    /// Column position in the record (0-based)
    pub position: usize,
    /// Optional column name for debugging/display
    pub name: Option<String>,
    /// Dictionary used to resolve codes of a symbol column
    pub symbols: Option<SymbolTableRef>,
}

impl ColumnRef {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            name: None,
            symbols: None,
        }
    }

    pub fn with_name(position: usize, name: impl Into<String>) -> Self {
        Self {
            position,
            name: Some(name.into()),
            symbols: None,
        }
    }
}

impl fmt::Debug for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnRef")
            .field("position", &self.position)
            .field("name", &self.name)
            .field("symbols", &self.symbols.as_ref().map(|t| t.size()))
            .finish()
    }
}

/// The shape of an operator node
#[derive(Debug, Clone)]
pub enum OperatorKind {
    /// Value read from the current record
    Column(ColumnRef),

    /// Literal constant value
    Constant(Value),

    /// Operation over one child
    Unary {
        op: UnaryOperator,
        operand: Box<Operator>,
    },

    /// Operation over two children
    Binary {
        op: BinaryOperator,
        left: Box<Operator>,
        right: Box<Operator>,
    },
}

/// A node of an operator tree.
///
/// Every node carries the physical type it was declared with. The type is
/// fixed at construction and selects which accessor callers may use (see
/// `eval`). Nodes own their children, so a tree has no sharing and no
/// cycles, and is immutable once built.
///
/// The plain constructors trust the caller to pass a type the planner has
/// already validated. `try_unary`, `try_binary` and `try_constant` infer or
/// check the type instead.
#[derive(Debug, Clone)]
pub struct Operator {
    kind: OperatorKind,
    physical_type: PhysicalType,
}

impl Operator {
    pub fn kind(&self) -> &OperatorKind {
        &self.kind
    }

    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    pub fn column(position: usize, physical_type: PhysicalType) -> Self {
        Self {
            kind: OperatorKind::Column(ColumnRef::new(position)),
            physical_type,
        }
    }

    pub fn column_with_name(
        position: usize,
        name: impl Into<String>,
        physical_type: PhysicalType,
    ) -> Self {
        Self {
            kind: OperatorKind::Column(ColumnRef::with_name(position, name)),
            physical_type,
        }
    }

    /// A symbol column whose codes resolve through `symbols`
    pub fn symbol_column(position: usize, symbols: SymbolTableRef) -> Self {
        Self {
            kind: OperatorKind::Column(ColumnRef {
                position,
                name: None,
                symbols: Some(symbols),
            }),
            physical_type: PhysicalType::Symbol,
        }
    }

    /// A constant declared as `physical_type`. `value` must be NULL or of
    /// that type.
    pub fn constant(physical_type: PhysicalType, value: Value) -> Self {
        debug_assert!(value.is_compatible_with(physical_type));
        Self {
            kind: OperatorKind::Constant(value),
            physical_type,
        }
    }

    pub fn try_constant(physical_type: PhysicalType, value: Value) -> ExpressionResult<Self> {
        if !value.is_compatible_with(physical_type) {
            return Err(ExpressionError::ConstantTypeMismatch {
                value,
                expected: physical_type,
            });
        }
        Ok(Self::constant(physical_type, value))
    }

    pub fn null(physical_type: PhysicalType) -> Self {
        Self::constant(physical_type, Value::Null)
    }

    pub fn bool(value: bool) -> Self {
        Self::constant(PhysicalType::Bool, Value::Bool(value))
    }

    /// `i32::MIN` yields a NULL constant.
    pub fn int32(value: i32) -> Self {
        Self::constant(PhysicalType::Int32, Value::int32(value))
    }

    /// `i64::MIN` yields a NULL constant.
    pub fn int64(value: i64) -> Self {
        Self::constant(PhysicalType::Int64, Value::int64(value))
    }

    /// NaN yields a NULL constant.
    pub fn float64(value: f64) -> Self {
        Self::constant(PhysicalType::Float64, Value::float64(value))
    }

    pub fn date(micros: i64) -> Self {
        Self::constant(PhysicalType::Date, Value::date(micros))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::constant(PhysicalType::String, Value::String(value.into()))
    }

    pub fn unary(op: UnaryOperator, physical_type: PhysicalType, operand: Operator) -> Self {
        Self {
            kind: OperatorKind::Unary {
                op,
                operand: Box::new(operand),
            },
            physical_type,
        }
    }

    pub fn binary(
        op: BinaryOperator,
        physical_type: PhysicalType,
        left: Operator,
        right: Operator,
    ) -> Self {
        Self {
            kind: OperatorKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            physical_type,
        }
    }

    /// Build a unary node, inferring its type from the operand
    pub fn try_unary(op: UnaryOperator, operand: Operator) -> ExpressionResult<Self> {
        let operand_type = operand.physical_type;
        match op.output_type(operand_type) {
            Some(physical_type) => Ok(Self::unary(op, physical_type, operand)),
            None => {
                log::debug!("rejected {} over {}", op, operand_type);
                Err(ExpressionError::InvalidOperandTypes {
                    operator: op.as_str(),
                    left: operand_type,
                    right: None,
                })
            }
        }
    }

    /// Build a binary node, inferring its type from the operands
    pub fn try_binary(
        op: BinaryOperator,
        left: Operator,
        right: Operator,
    ) -> ExpressionResult<Self> {
        let (left_type, right_type) = (left.physical_type, right.physical_type);
        let output_type = op
            .output_type(left_type, right_type)
            .filter(|_| !op.is_comparison() || left.comparison_domain(&right).is_some());
        match output_type {
            Some(physical_type) => Ok(Self::binary(op, physical_type, left, right)),
            None => {
                log::debug!("rejected {} {} {}", left_type, op, right_type);
                Err(ExpressionError::InvalidOperandTypes {
                    operator: op.as_str(),
                    left: left_type,
                    right: Some(right_type),
                })
            }
        }
    }

    pub fn add(left: Operator, right: Operator) -> ExpressionResult<Self> {
        Self::try_binary(BinaryOperator::Add, left, right)
    }

    pub fn sub(left: Operator, right: Operator) -> ExpressionResult<Self> {
        Self::try_binary(BinaryOperator::Sub, left, right)
    }

    pub fn mul(left: Operator, right: Operator) -> ExpressionResult<Self> {
        Self::try_binary(BinaryOperator::Mul, left, right)
    }

    pub fn div(left: Operator, right: Operator) -> ExpressionResult<Self> {
        Self::try_binary(BinaryOperator::Div, left, right)
    }

    pub fn and(left: Operator, right: Operator) -> ExpressionResult<Self> {
        Self::try_binary(BinaryOperator::And, left, right)
    }

    pub fn or(left: Operator, right: Operator) -> ExpressionResult<Self> {
        Self::try_binary(BinaryOperator::Or, left, right)
    }

    pub fn neg(operand: Operator) -> ExpressionResult<Self> {
        Self::try_unary(UnaryOperator::Neg, operand)
    }

    pub fn not(operand: Operator) -> ExpressionResult<Self> {
        Self::try_unary(UnaryOperator::Not, operand)
    }

    pub fn is_null(operand: Operator) -> Self {
        Self::unary(UnaryOperator::IsNull, PhysicalType::Bool, operand)
    }

    pub fn is_not_null(operand: Operator) -> Self {
        Self::unary(UnaryOperator::IsNotNull, PhysicalType::Bool, operand)
    }

    /// The domain this node is compared with `other` in, or `None` when
    /// the two cannot be compared.
    ///
    /// A symbol operand compares as text only when its codes can be
    /// resolved, that is a column with a bound table or a NULL constant.
    /// Otherwise it can only meet another symbol, by raw code.
    pub(crate) fn comparison_domain(&self, other: &Operator) -> Option<ComparisonDomain> {
        let domain = comparison_domain(self.physical_type, other.physical_type)?;
        if domain != ComparisonDomain::Text {
            return Some(domain);
        }

        match (self.resolves_text(), other.resolves_text()) {
            (true, true) => Some(ComparisonDomain::Text),
            _ if self.physical_type == other.physical_type => Some(ComparisonDomain::SymbolCode),
            _ => None,
        }
    }

    fn resolves_text(&self) -> bool {
        match &self.kind {
            _ if self.physical_type == PhysicalType::String => true,
            OperatorKind::Column(col) => col.symbols.is_some(),
            OperatorKind::Constant(value) => value.is_null(),
            _ => false,
        }
    }

    /// Check if this operator reads nothing from the record
    pub fn is_constant(&self) -> bool {
        match &self.kind {
            OperatorKind::Constant(_) => true,
            OperatorKind::Column(_) => false,
            OperatorKind::Unary { operand, .. } => operand.is_constant(),
            OperatorKind::Binary { left, right, .. } => left.is_constant() && right.is_constant(),
        }
    }

    /// Replace every constant subtree with a single `Constant` leaf holding
    /// its value. Declared types are preserved.
    pub fn fold_constants(self) -> Self {
        let physical_type = self.physical_type;
        let kind = match self.kind {
            OperatorKind::Unary { op, operand } => OperatorKind::Unary {
                op,
                operand: Box::new(operand.fold_constants()),
            },
            OperatorKind::Binary { op, left, right } => OperatorKind::Binary {
                op,
                left: Box::new(left.fold_constants()),
                right: Box::new(right.fold_constants()),
            },
            leaf => leaf,
        };
        let folded = Self {
            kind,
            physical_type,
        };

        if matches!(folded.kind, OperatorKind::Constant(_)) || !folded.is_constant() {
            return folded;
        }

        let value = folded.evaluate(&EmptyRecord);
        log::trace!("folded constant {} node to {:?}", physical_type, value);
        Self::constant(physical_type, value)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OperatorKind::Column(col) => match &col.name {
                Some(name) => f.write_str(name),
                None => write!(f, "${}", col.position),
            },
            OperatorKind::Constant(Value::Null) => f.write_str("NULL"),
            OperatorKind::Constant(Value::String(s)) => write!(f, "'{}'", s),
            OperatorKind::Constant(Value::Bool(b)) => write!(f, "{}", b),
            OperatorKind::Constant(Value::Int32(v)) => write!(f, "{}", v),
            OperatorKind::Constant(Value::Int64(v)) => write!(f, "{}L", v),
            OperatorKind::Constant(Value::Float64(v)) => write!(f, "{:?}", v),
            OperatorKind::Constant(Value::Date(v)) => write!(f, "DATE {}", v),
            OperatorKind::Constant(Value::Symbol(code)) => write!(f, "#{}", code),
            OperatorKind::Unary {
                op: op @ (UnaryOperator::IsNull | UnaryOperator::IsNotNull),
                operand,
            } => write!(f, "({} {})", operand, op),
            OperatorKind::Unary { op, operand } => write!(f, "{}({})", op, operand),
            OperatorKind::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{PartitionBy, PartitionBySymbolTable};
    use std::sync::Arc;

    #[test]
    fn test_column_ref() {
        let col1 = ColumnRef::new(0);
        assert_eq!(col1.position, 0);
        assert!(col1.name.is_none());
        assert!(col1.symbols.is_none());

        let col2 = ColumnRef::with_name(1, "price");
        assert_eq!(col2.position, 1);
        assert_eq!(col2.name.as_deref(), Some("price"));
    }

    #[test]
    fn test_constants() {
        assert!(matches!(
            Operator::int64(i64::MIN).kind(),
            OperatorKind::Constant(Value::Null)
        ));
        assert!(matches!(
            Operator::int64(7).kind(),
            OperatorKind::Constant(Value::Int64(7))
        ));
        assert_eq!(Operator::null(PhysicalType::Date).physical_type(), PhysicalType::Date);

        assert!(Operator::try_constant(PhysicalType::Int64, Value::Int64(1)).is_ok());
        assert!(Operator::try_constant(PhysicalType::Int64, Value::Null).is_ok());
        assert_eq!(
            Operator::try_constant(PhysicalType::Int64, Value::Float64(1.0)).unwrap_err(),
            ExpressionError::ConstantTypeMismatch {
                value: Value::Float64(1.0),
                expected: PhysicalType::Int64,
            }
        );
    }

    #[test]
    fn test_type_inference() {
        let expr = Operator::add(
            Operator::column(0, PhysicalType::Int32),
            Operator::column(1, PhysicalType::Int64),
        )
        .unwrap();
        assert_eq!(expr.physical_type(), PhysicalType::Int64);

        let expr = Operator::div(expr, Operator::float64(2.0)).unwrap();
        assert_eq!(expr.physical_type(), PhysicalType::Float64);

        let err = Operator::add(Operator::int64(1), Operator::string("x")).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::InvalidOperandTypes {
                operator: "+",
                left: PhysicalType::Int64,
                right: Some(PhysicalType::String),
            }
        );

        let err = Operator::not(Operator::int32(1)).unwrap_err();
        assert!(matches!(err, ExpressionError::InvalidOperandTypes { right: None, .. }));

        let floor = Operator::try_unary(
            UnaryOperator::Floor(PartitionBy::Day),
            Operator::column(0, PhysicalType::Date),
        )
        .unwrap();
        assert_eq!(floor.physical_type(), PhysicalType::Date);
    }

    #[test]
    fn test_is_constant() {
        assert!(Operator::int64(42).is_constant());
        assert!(!Operator::column(0, PhysicalType::Int64).is_constant());
        assert!(Operator::add(Operator::int64(1), Operator::int64(2))
            .unwrap()
            .is_constant());
        assert!(!Operator::add(Operator::column(0, PhysicalType::Int64), Operator::int64(2))
            .unwrap()
            .is_constant());
        assert!(Operator::is_null(Operator::null(PhysicalType::Int32)).is_constant());
        assert!(!Operator::symbol_column(0, Arc::new(PartitionBySymbolTable::new())).is_constant());
    }

    #[test]
    fn test_fold_constants() {
        // ($0 + (10 + 20)) stays a binary node with a folded right side
        let expr = Operator::add(
            Operator::column(0, PhysicalType::Int64),
            Operator::add(Operator::int64(10), Operator::int64(20)).unwrap(),
        )
        .unwrap()
        .fold_constants();
        match expr.kind() {
            OperatorKind::Binary { left, right, .. } => {
                assert!(matches!(left.kind(), OperatorKind::Column(_)));
                assert!(matches!(right.kind(), OperatorKind::Constant(Value::Int64(30))));
            }
            other => panic!("unexpected kind {:?}", other),
        }

        // NULL propagates into the folded constant, keeping the declared type
        let expr = Operator::mul(Operator::int32(3), Operator::null(PhysicalType::Int32))
            .unwrap()
            .fold_constants();
        assert!(matches!(expr.kind(), OperatorKind::Constant(Value::Null)));
        assert_eq!(expr.physical_type(), PhysicalType::Int32);

        let expr = Operator::not(Operator::bool(false)).unwrap().fold_constants();
        assert!(matches!(expr.kind(), OperatorKind::Constant(Value::Bool(true))));
    }

    #[test]
    fn test_display() {
        let expr = Operator::add(
            Operator::column_with_name(0, "qty", PhysicalType::Int64),
            Operator::int64(5),
        )
        .unwrap();
        assert_eq!(expr.to_string(), "(qty + 5L)");

        let expr = Operator::is_null(Operator::column(2, PhysicalType::String));
        assert_eq!(expr.to_string(), "($2 IS NULL)");

        let expr = Operator::try_unary(
            UnaryOperator::Floor(PartitionBy::Year),
            Operator::null(PhysicalType::Date),
        )
        .unwrap();
        assert_eq!(expr.to_string(), "FLOOR(YEAR)(NULL)");
    }
}
