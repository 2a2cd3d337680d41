use anyhow::{anyhow, Result};
use std::fmt;

/// Physical value kinds an operator can be declared to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Bool,
    Int32,
    Int64,
    Float64,
    /// Microseconds since the Unix epoch.
    Date,
    /// Dictionary code resolved through a `SymbolTable`.
    Symbol,
    String,
}

/// Reserved NULL sentinels. Ordinary values never collide with these.
pub mod null {
    pub const BOOL: bool = false;
    pub const INT32: i32 = i32::MIN;
    pub const INT64: i64 = i64::MIN;
    pub const DATE: i64 = i64::MIN;
    pub const FLOAT64: f64 = f64::NAN;
    pub const SYMBOL: i32 = crate::symbol::VALUE_IS_NULL;
}

/// The NULL representation of a physical type, in that type's own domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NullSentinel {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    /// Reference types use absence rather than an in-domain value.
    Absent,
}

impl PhysicalType {
    pub const ALL: [PhysicalType; 7] = [
        PhysicalType::Bool,
        PhysicalType::Int32,
        PhysicalType::Int64,
        PhysicalType::Float64,
        PhysicalType::Date,
        PhysicalType::Symbol,
        PhysicalType::String,
    ];

    /// Parse a type name as written in plans and on the command line.
    pub fn from_name(name: &str) -> Result<Self> {
        PhysicalType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Unknown physical type: {}", name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PhysicalType::Bool => "BOOLEAN",
            PhysicalType::Int32 => "INT",
            PhysicalType::Int64 => "LONG",
            PhysicalType::Float64 => "DOUBLE",
            PhysicalType::Date => "DATE",
            PhysicalType::Symbol => "SYMBOL",
            PhysicalType::String => "STRING",
        }
    }

    pub const fn null_sentinel(&self) -> NullSentinel {
        match self {
            PhysicalType::Bool => NullSentinel::Bool(null::BOOL),
            PhysicalType::Int32 => NullSentinel::Int32(null::INT32),
            PhysicalType::Int64 => NullSentinel::Int64(null::INT64),
            PhysicalType::Date => NullSentinel::Int64(null::DATE),
            PhysicalType::Float64 => NullSentinel::Float64(null::FLOAT64),
            PhysicalType::Symbol => NullSentinel::Int32(null::SYMBOL),
            PhysicalType::String => NullSentinel::Absent,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PhysicalType::Int32 | PhysicalType::Int64 | PhysicalType::Float64
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, PhysicalType::Int32 | PhysicalType::Int64)
    }

    /// Rank used for arithmetic promotion. `None` for non-numeric types.
    pub(crate) fn numeric_rank(&self) -> Option<u8> {
        match self {
            PhysicalType::Int32 => Some(0),
            PhysicalType::Int64 => Some(1),
            PhysicalType::Float64 => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_type_names() -> Result<()> {
        for ty in PhysicalType::ALL {
            assert_eq!(PhysicalType::from_name(ty.name())?, ty);
        }
        assert_eq!(PhysicalType::from_name("long")?, PhysicalType::Int64);
        assert!(PhysicalType::from_name("decimal").is_err());
        Ok(())
    }

    #[test]
    fn test_null_sentinels() {
        assert_eq!(
            PhysicalType::Int64.null_sentinel(),
            NullSentinel::Int64(i64::MIN)
        );
        assert_eq!(
            PhysicalType::Int32.null_sentinel(),
            NullSentinel::Int32(i32::MIN)
        );
        assert_eq!(PhysicalType::Symbol.null_sentinel(), NullSentinel::Int32(-1));
        assert_eq!(
            PhysicalType::Date.null_sentinel(),
            NullSentinel::Int64(i64::MIN)
        );
        assert_eq!(PhysicalType::String.null_sentinel(), NullSentinel::Absent);

        // NaN never compares equal, so check the payload directly
        match PhysicalType::Float64.null_sentinel() {
            NullSentinel::Float64(v) => assert!(v.is_nan()),
            other => panic!("unexpected sentinel {:?}", other),
        }
    }

    #[test]
    fn test_numeric_classification() {
        assert!(PhysicalType::Int32.is_numeric());
        assert!(PhysicalType::Float64.is_numeric());
        assert!(!PhysicalType::Date.is_numeric());
        assert!(PhysicalType::Int64.is_integer());
        assert!(!PhysicalType::Float64.is_integer());
        assert!(PhysicalType::Int32.numeric_rank() < PhysicalType::Int64.numeric_rank());
        assert_eq!(PhysicalType::Symbol.numeric_rank(), None);
    }
}
