use crate::types::{null, PhysicalType};
use anyhow::{bail, Context, Result};

/// A single value with NULL made explicit.
///
/// The evaluation path works on raw sentinels; `Value` is what planning,
/// constant folding and tests see. Constructors taking raw sentinels map
/// them to `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Date(i64),
    Symbol(i32),
    String(String),
}

impl Value {
    pub fn int32(v: i32) -> Self {
        if v == null::INT32 {
            Value::Null
        } else {
            Value::Int32(v)
        }
    }

    pub fn int64(v: i64) -> Self {
        if v == null::INT64 {
            Value::Null
        } else {
            Value::Int64(v)
        }
    }

    pub fn float64(v: f64) -> Self {
        if v.is_nan() {
            Value::Null
        } else {
            Value::Float64(v)
        }
    }

    pub fn date(v: i64) -> Self {
        if v == null::DATE {
            Value::Null
        } else {
            Value::Date(v)
        }
    }

    pub fn symbol(code: i32) -> Self {
        if code == null::SYMBOL {
            Value::Null
        } else {
            Value::Symbol(code)
        }
    }

    pub fn string(v: Option<&str>) -> Self {
        v.map_or(Value::Null, |s| Value::String(s.to_string()))
    }

    /// Get the physical type of this value
    pub fn physical_type(&self) -> Option<PhysicalType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(PhysicalType::Bool),
            Value::Int32(_) => Some(PhysicalType::Int32),
            Value::Int64(_) => Some(PhysicalType::Int64),
            Value::Float64(_) => Some(PhysicalType::Float64),
            Value::Date(_) => Some(PhysicalType::Date),
            Value::Symbol(_) => Some(PhysicalType::Symbol),
            Value::String(_) => Some(PhysicalType::String),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value can be stored in a slot of the given type
    pub fn is_compatible_with(&self, ty: PhysicalType) -> bool {
        match self {
            Value::Null => true,
            other => other.physical_type() == Some(ty),
        }
    }

    /// Parse literal text as a value of the given type. `null` (any case)
    /// parses to `Value::Null` for every type.
    pub fn parse(ty: PhysicalType, text: &str) -> Result<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("null") {
            return Ok(Value::Null);
        }

        let value = match ty {
            PhysicalType::Bool => match text.to_ascii_lowercase().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => bail!("Invalid boolean literal: {}", text),
            },
            PhysicalType::Int32 => Value::int32(
                text.parse()
                    .with_context(|| format!("Invalid int literal: {}", text))?,
            ),
            PhysicalType::Int64 => Value::int64(
                text.parse()
                    .with_context(|| format!("Invalid long literal: {}", text))?,
            ),
            PhysicalType::Float64 => Value::float64(
                text.parse()
                    .with_context(|| format!("Invalid double literal: {}", text))?,
            ),
            PhysicalType::Date => Value::date(
                text.parse()
                    .with_context(|| format!("Invalid date literal: {}", text))?,
            ),
            PhysicalType::Symbol => {
                let code: i32 = text
                    .parse()
                    .with_context(|| format!("Invalid symbol code: {}", text))?;
                if code < 0 {
                    bail!("Invalid symbol code: {}", code);
                }
                Value::Symbol(code)
            }
            PhysicalType::String => Value::String(text.to_string()),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_become_null() {
        assert_eq!(Value::int64(i64::MIN), Value::Null);
        assert_eq!(Value::int64(42), Value::Int64(42));
        assert_eq!(Value::int32(i32::MIN), Value::Null);
        assert_eq!(Value::float64(f64::NAN), Value::Null);
        assert_eq!(Value::float64(f64::INFINITY), Value::Float64(f64::INFINITY));
        assert_eq!(Value::date(i64::MIN), Value::Null);
        assert_eq!(Value::symbol(-1), Value::Null);
        assert_eq!(Value::symbol(3), Value::Symbol(3));
        assert_eq!(Value::string(None), Value::Null);
        assert_eq!(Value::string(Some("a")), Value::String("a".to_string()));
    }

    #[test]
    fn test_value_compatibility() {
        assert!(Value::Null.is_compatible_with(PhysicalType::Int64));
        assert!(Value::Int64(1).is_compatible_with(PhysicalType::Int64));
        assert!(Value::Date(1).is_compatible_with(PhysicalType::Date));
        assert!(!Value::Int32(1).is_compatible_with(PhysicalType::Int64));
        assert!(!Value::String("x".into()).is_compatible_with(PhysicalType::Symbol));
    }

    #[test]
    fn test_parse() -> Result<()> {
        assert_eq!(Value::parse(PhysicalType::Int64, "10")?, Value::Int64(10));
        assert_eq!(Value::parse(PhysicalType::Int64, " -7 ")?, Value::Int64(-7));
        assert_eq!(Value::parse(PhysicalType::Int64, "NULL")?, Value::Null);
        assert_eq!(
            Value::parse(PhysicalType::Int64, "-9223372036854775808")?,
            Value::Null
        );
        assert_eq!(Value::parse(PhysicalType::Int32, "5")?, Value::Int32(5));
        assert_eq!(
            Value::parse(PhysicalType::Float64, "2.5")?,
            Value::Float64(2.5)
        );
        assert_eq!(Value::parse(PhysicalType::Bool, "TRUE")?, Value::Bool(true));
        assert_eq!(
            Value::parse(PhysicalType::String, "DAY")?,
            Value::String("DAY".to_string())
        );

        assert!(Value::parse(PhysicalType::Int64, "abc").is_err());
        assert!(Value::parse(PhysicalType::Int32, "99999999999").is_err());
        assert!(Value::parse(PhysicalType::Bool, "yes").is_err());
        assert!(Value::parse(PhysicalType::Symbol, "-3").is_err());
        Ok(())
    }
}
