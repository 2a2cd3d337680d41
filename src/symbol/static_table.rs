use crate::symbol::{invalid_code, SymbolError, SymbolResult, SymbolTable, VALUE_IS_NULL};
use std::collections::HashMap;

/// Read-only dictionary for a symbol column.
///
/// Codes are assigned densely in the order values are supplied, which is
/// the order the storage layer persisted them in.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbolTable {
    values: Vec<String>,
    codes: HashMap<String, i32>,
}

impl StaticSymbolTable {
    pub fn new<I, S>(values: I) -> SymbolResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if i32::try_from(values.len()).is_err() {
            return Err(SymbolError::TooManyValues { size: values.len() });
        }

        let mut codes = HashMap::with_capacity(values.len());
        for (code, value) in values.iter().enumerate() {
            if codes.insert(value.clone(), code as i32).is_some() {
                return Err(SymbolError::DuplicateValue {
                    value: value.clone(),
                    code,
                });
            }
        }

        Ok(Self { values, codes })
    }
}

impl SymbolTable for StaticSymbolTable {
    fn get_quick(&self, value: &str) -> i32 {
        self.codes.get(value).copied().unwrap_or(VALUE_IS_NULL)
    }

    fn value(&self, key: i32) -> Option<&str> {
        if key == VALUE_IS_NULL {
            return None;
        }
        match usize::try_from(key).ok().and_then(|idx| self.values.get(idx)) {
            Some(value) => Some(value.as_str()),
            None => invalid_code(key, self.values.len()),
        }
    }

    fn size(&self) -> usize {
        self.values.len()
    }
}
