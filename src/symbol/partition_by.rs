//! Partitioning schemes and their fixed symbol domain.

use crate::symbol::{invalid_code, SymbolError, SymbolTable, VALUE_IS_NULL};
use crate::types::null;
use chrono::{DateTime, Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// How stored data is split into time-based segments.
///
/// Discriminants are the stable codes exposed through
/// `PartitionBySymbolTable`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionBy {
    None = 0,
    Day = 1,
    Month = 2,
    Year = 3,
}

impl PartitionBy {
    /// All schemes in code order.
    pub const ALL: [PartitionBy; 4] = [
        PartitionBy::None,
        PartitionBy::Day,
        PartitionBy::Month,
        PartitionBy::Year,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const fn code(&self) -> i32 {
        *self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Look up a scheme by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(name))
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PartitionBy::None => "NONE",
            PartitionBy::Day => "DAY",
            PartitionBy::Month => "MONTH",
            PartitionBy::Year => "YEAR",
        }
    }

    /// Start of the partition containing `micros`, in microseconds since the
    /// epoch. `NONE` keeps a single partition, so timestamps pass through.
    ///
    /// NULL maps to NULL, as does a timestamp outside the calendar range.
    pub fn floor(&self, micros: i64) -> i64 {
        if *self == PartitionBy::None || micros == null::DATE {
            return micros;
        }

        let Some(date) = DateTime::from_timestamp_micros(micros).map(|ts| ts.date_naive()) else {
            return null::DATE;
        };
        let start = match self {
            PartitionBy::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
            PartitionBy::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            _ => Some(date),
        };

        start
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc().timestamp_micros())
            .filter(|v| *v != null::DATE)
            .unwrap_or(null::DATE)
    }
}

impl fmt::Display for PartitionBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionBy {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SymbolError::UnknownPartitionBy(s.to_string()))
    }
}

/// Symbol table over the fixed `PartitionBy` domain.
///
/// Holds no data, so a value can be created wherever one is needed and
/// shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionBySymbolTable;

impl PartitionBySymbolTable {
    pub const fn new() -> Self {
        PartitionBySymbolTable
    }
}

impl SymbolTable for PartitionBySymbolTable {
    fn get_quick(&self, value: &str) -> i32 {
        PartitionBy::from_name(value).map_or(VALUE_IS_NULL, |scheme| scheme.code())
    }

    fn value(&self, key: i32) -> Option<&str> {
        if key == VALUE_IS_NULL {
            return None;
        }
        match PartitionBy::from_code(key) {
            Some(scheme) => Some(scheme.as_str()),
            None => invalid_code(key, PartitionBy::COUNT),
        }
    }

    fn size(&self) -> usize {
        PartitionBy::COUNT
    }
}
