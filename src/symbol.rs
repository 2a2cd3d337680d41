//! Symbol tables: bidirectional mappings between dense integer codes and
//! strings.
//!
//! - **SymbolTable**: the lookup contract shared by dictionary-encoded
//!   columns and fixed system domains
//! - **StaticSymbolTable**: a read-only dictionary loaded from a list of
//!   distinct values
//! - **PartitionBySymbolTable**: the fixed domain of partitioning schemes

pub mod partition_by;
pub mod static_table;

pub use partition_by::{PartitionBy, PartitionBySymbolTable};
pub use static_table::StaticSymbolTable;

use std::sync::Arc;
use thiserror::Error;

/// Code reserved for NULL. Never a valid code in any table.
pub const VALUE_IS_NULL: i32 = -1;

/// A bijection between `0..size()` and a set of distinct strings.
///
/// Lookups never mutate the table; dictionaries that allocate codes on a
/// miss are a separate concern.
pub trait SymbolTable: Send + Sync {
    /// Code for `value`, or `VALUE_IS_NULL` when the value is not in the
    /// domain.
    fn get_quick(&self, value: &str) -> i32;

    /// String for `key`, or `None` for `VALUE_IS_NULL`.
    ///
    /// # Panics
    /// On any other code outside `0..size()`.
    fn value(&self, key: i32) -> Option<&str>;

    /// Number of codes in the domain.
    fn size(&self) -> usize;
}

/// Shared handle to a symbol table, as bound into symbol-column leaves.
pub type SymbolTableRef = Arc<dyn SymbolTable>;

/// Panic for a code a caller could not have obtained from the table.
pub(crate) fn invalid_code(key: i32, size: usize) -> ! {
    panic!("Symbol code {} out of range for table of size {}", key, size)
}

/// Errors that can occur while building a symbol table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("Duplicate symbol value: '{value}' at code {code}")]
    DuplicateValue { value: String, code: usize },

    #[error("Symbol table too large: {size} values")]
    TooManyValues { size: usize },

    #[error("Unknown partition scheme: {0}")]
    UnknownPartitionBy(String),
}

/// Result type for symbol table operations.
pub type SymbolResult<T> = Result<T, SymbolError>;
