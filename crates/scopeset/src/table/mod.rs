//! Module: table
//! Responsibility: row assembly of raw transaction records.
//! Does not own: grouping or aggregation (always delegated remotely).
//! Boundary: shapes whatever rows it receives; nothing is dropped or
//! deduplicated here.


use serde::Serialize;
use serde_json::Value;

use crate::{query::ScopeKeyMap, types::Transaction};

///
/// Table
///
/// Materialized tabular result: ordered column names plus one row of JSON
/// cells per record. Column order follows the scope-key map order.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Assemble records into rows through the scope-key map.
    ///
    /// Each record becomes exactly one row; a scope missing from a record
    /// yields a null cell.
    #[must_use]
    pub fn assemble(records: &[Transaction], keys: &ScopeKeyMap) -> Self {
        let columns = keys.column_names();

        let rows = records
            .iter()
            .map(|record| {
                keys.iter()
                    .map(|(scope_id, _)| record.value_of(scope_id).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell by row index and column name.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)
    }
}
