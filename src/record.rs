//! Positional, typed access to one row of columnar data.
//!
//! Storage and cursor layers implement `Record`; operator leaves read
//! through it. Accessors return raw values with NULL encoded as the
//! requested type's sentinel (see `types::null`).

use crate::types::{null, Value};

/// One row of data, read by column position.
///
/// Asking for a column with an accessor that does not match its stored
/// type is a caller bug. Implementations may panic.
pub trait Record {
    fn get_bool(&self, pos: usize) -> bool;

    fn get_int32(&self, pos: usize) -> i32;

    fn get_int64(&self, pos: usize) -> i64;

    fn get_float64(&self, pos: usize) -> f64;

    /// Microseconds since the Unix epoch.
    fn get_date(&self, pos: usize) -> i64;

    fn get_symbol_code(&self, pos: usize) -> i32;

    /// `None` when the value is NULL.
    fn get_str(&self, pos: usize) -> Option<&str>;
}

/// An in-memory row backed by `Value`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueRecord {
    values: Vec<Value>,
}

impl ValueRecord {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn cell(&self, pos: usize) -> &Value {
        match self.values.get(pos) {
            Some(value) => value,
            None => panic!(
                "Column index {} out of bounds for record with {} columns",
                pos,
                self.values.len()
            ),
        }
    }
}

impl From<Vec<Value>> for ValueRecord {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

fn type_violation(pos: usize, accessor: &str, value: &Value) -> ! {
    panic!(
        "{} called on column {} holding {:?}",
        accessor,
        pos,
        value.physical_type()
    )
}

impl Record for ValueRecord {
    fn get_bool(&self, pos: usize) -> bool {
        match self.cell(pos) {
            Value::Null => null::BOOL,
            Value::Bool(b) => *b,
            other => type_violation(pos, "get_bool", other),
        }
    }

    fn get_int32(&self, pos: usize) -> i32 {
        match self.cell(pos) {
            Value::Null => null::INT32,
            Value::Int32(v) => *v,
            other => type_violation(pos, "get_int32", other),
        }
    }

    fn get_int64(&self, pos: usize) -> i64 {
        match self.cell(pos) {
            Value::Null => null::INT64,
            Value::Int64(v) | Value::Date(v) => *v,
            other => type_violation(pos, "get_int64", other),
        }
    }

    fn get_float64(&self, pos: usize) -> f64 {
        match self.cell(pos) {
            Value::Null => null::FLOAT64,
            Value::Float64(v) => *v,
            other => type_violation(pos, "get_float64", other),
        }
    }

    fn get_date(&self, pos: usize) -> i64 {
        match self.cell(pos) {
            Value::Null => null::DATE,
            Value::Date(v) | Value::Int64(v) => *v,
            other => type_violation(pos, "get_date", other),
        }
    }

    fn get_symbol_code(&self, pos: usize) -> i32 {
        match self.cell(pos) {
            Value::Null => null::SYMBOL,
            Value::Symbol(code) => *code,
            other => type_violation(pos, "get_symbol_code", other),
        }
    }

    fn get_str(&self, pos: usize) -> Option<&str> {
        match self.cell(pos) {
            Value::Null => None,
            Value::String(s) => Some(s.as_str()),
            other => type_violation(pos, "get_str", other),
        }
    }
}

/// A record with no columns, used where evaluation must not touch row data
/// (constant subtrees).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRecord;

impl EmptyRecord {
    fn no_columns(pos: usize) -> ! {
        panic!("Column {} read from an empty record", pos)
    }
}

impl Record for EmptyRecord {
    fn get_bool(&self, pos: usize) -> bool {
        Self::no_columns(pos)
    }

    fn get_int32(&self, pos: usize) -> i32 {
        Self::no_columns(pos)
    }

    fn get_int64(&self, pos: usize) -> i64 {
        Self::no_columns(pos)
    }

    fn get_float64(&self, pos: usize) -> f64 {
        Self::no_columns(pos)
    }

    fn get_date(&self, pos: usize) -> i64 {
        Self::no_columns(pos)
    }

    fn get_symbol_code(&self, pos: usize) -> i32 {
        Self::no_columns(pos)
    }

    fn get_str(&self, pos: usize) -> Option<&str> {
        Self::no_columns(pos)
    }
}
