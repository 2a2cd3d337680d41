//! Shared, read-only resources for building and evaluating operator trees.

use crate::expression::{ExpressionError, ExpressionResult, Operator};
use crate::symbol::{PartitionBySymbolTable, SymbolTableRef};
use std::collections::HashMap;
use std::sync::Arc;

/// Execution context holding the symbol tables a query may bind to.
///
/// Built once per process (or per query) and handed to planners by
/// reference. Everything inside is immutable, so a context can be shared
/// across threads evaluating the same trees.
#[derive(Clone)]
pub struct ExecutionContext {
    partition_by: Arc<PartitionBySymbolTable>,
    symbol_tables: HashMap<usize, SymbolTableRef>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        log::debug!("creating execution context");
        Self {
            partition_by: Arc::new(PartitionBySymbolTable::new()),
            symbol_tables: HashMap::new(),
        }
    }

    /// Attach the dictionary of the symbol column at `position`
    pub fn with_symbol_table(mut self, position: usize, table: SymbolTableRef) -> Self {
        log::debug!(
            "binding symbol table of size {} to column {}",
            table.size(),
            position
        );
        self.symbol_tables.insert(position, table);
        self
    }

    pub fn partition_by(&self) -> &PartitionBySymbolTable {
        &self.partition_by
    }

    pub fn symbol_table(&self, position: usize) -> Option<&SymbolTableRef> {
        self.symbol_tables.get(&position)
    }

    /// A symbol-column leaf bound to the dictionary registered for `position`
    pub fn symbol_column(&self, position: usize) -> ExpressionResult<Operator> {
        let table = self
            .symbol_tables
            .get(&position)
            .ok_or(ExpressionError::MissingSymbolTable { position })?;
        Ok(Operator::symbol_column(position, Arc::clone(table)))
    }

    /// A symbol-column leaf whose codes are partition schemes, as surfaced
    /// by metadata queries over table definitions.
    pub fn partition_by_column(&self, position: usize) -> Operator {
        let table: SymbolTableRef = self.partition_by.clone();
        Operator::symbol_column(position, table)
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
