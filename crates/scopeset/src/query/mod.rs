//! Module: query
//! Responsibility: request-payload construction for the transaction query.
//! Does not own: scope resolution (catalog) or pagination (fetch).
//! Boundary: building is pure; when the inputs carry malformed time bounds
//! the build fails fast, before any request is issued.

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{
    catalog::ResolvedColumn,
    error::SpecError,
    types::{ScopeId, ScopeValueId, TransactionId},
};

///
/// ScopeKeyMap
///
/// Ordered mapping from scope identifier to output column name, built from
/// the full ordered column list. When two columns resolve to the same scope
/// the later column's key wins while the first column's position is kept
/// (last-write-wins, documented behavior rather than an error).
///

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeKeyMap {
    entries: Vec<(ScopeId, String)>,
}

impl ScopeKeyMap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build the map from resolved columns, defaulting keys to `scope_<id>`.
    #[must_use]
    pub fn from_columns(columns: &[ResolvedColumn]) -> Self {
        let mut map = Self::new();

        for column in columns {
            let id = column.scope.id;
            let key = column
                .spec
                .key()
                .map_or_else(|| format!("scope_{id}"), str::to_string);

            map.insert(id, key);
        }

        map
    }

    pub fn insert(&mut self, id: ScopeId, key: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = key,
            None => self.entries.push((id, key)),
        }
    }

    #[must_use]
    pub fn key_of(&self, id: ScopeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, key)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &str)> {
        self.entries.iter().map(|(id, key)| (*id, key.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Output column names, in map order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.entries.iter().map(|(_, key)| key.clone()).collect()
    }
}

///
/// AggregationMethod
/// One `{scope_id, method}` directive delegated to the remote side.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AggregationMethod {
    pub scope_id: ScopeId,
    pub method: String,
}

///
/// TransactionQuery
///
/// The single request payload sent to the transactions endpoint. Optional
/// fields are omitted from the encoded body entirely when absent.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionQuery {
    pub aggregate: bool,

    /// Resolved scope identifiers, in column order.
    pub select_scopes: Vec<ScopeId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_transaction_ids: Option<Vec<TransactionId>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_scope_values: Option<Vec<ScopeValueId>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_methods: Option<Vec<AggregationMethod>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<DateTime<Utc>>,
}

///
/// TimeBound
///
/// Caller-supplied time boundary: either already typed, or text parsed as
/// RFC 3339. Malformed text fails the build before any request is sent.
///

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeBound {
    At(DateTime<Utc>),
    Text(String),
}

impl TimeBound {
    fn resolve(self, field: &'static str) -> Result<DateTime<Utc>, SpecError> {
        match self {
            Self::At(at) => Ok(at),
            Self::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|at| at.with_timezone(&Utc))
                .map_err(|_| SpecError::MalformedTimestamp { field, value: text }),
        }
    }
}

impl From<DateTime<Utc>> for TimeBound {
    fn from(at: DateTime<Utc>) -> Self {
        Self::At(at)
    }
}

impl From<&str> for TimeBound {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TimeBound {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

///
/// QueryBuilder
///
/// Assembles the payload from the aggregate flag and the resolved column
/// list, plus the independent optional directives.
///

pub struct QueryBuilder<'a> {
    aggregate: bool,
    columns: &'a [ResolvedColumn],
    intake_status: Option<String>,
    filter_transaction_ids: Option<Vec<TransactionId>>,
    start_date_time: Option<TimeBound>,
    end_date_time: Option<TimeBound>,
}

impl<'a> QueryBuilder<'a> {
    #[must_use]
    pub const fn new(aggregate: bool, columns: &'a [ResolvedColumn]) -> Self {
        Self {
            aggregate,
            columns,
            intake_status: None,
            filter_transaction_ids: None,
            start_date_time: None,
            end_date_time: None,
        }
    }

    /// Intake status to pin the query to; `None` lets the service decide.
    #[must_use]
    pub fn intake_status(mut self, status: Option<String>) -> Self {
        self.intake_status = status;
        self
    }

    #[must_use]
    pub fn filter_transaction_ids(mut self, ids: Option<Vec<TransactionId>>) -> Self {
        self.filter_transaction_ids = ids;
        self
    }

    #[must_use]
    pub fn start_date_time(mut self, bound: Option<TimeBound>) -> Self {
        self.start_date_time = bound;
        self
    }

    #[must_use]
    pub fn end_date_time(mut self, bound: Option<TimeBound>) -> Self {
        self.end_date_time = bound;
        self
    }

    pub fn build(self) -> Result<TransactionQuery, SpecError> {
        let select_scopes: Vec<ScopeId> = self.columns.iter().map(|c| c.scope.id).collect();

        // Flattened value ids from every column that declared a filter and
        // resolved scope values, membership-tested before plucking.
        let filters: Vec<ScopeValueId> = self
            .columns
            .iter()
            .filter_map(|c| Some((c.spec.filter()?, c.scope_values.as_ref()?)))
            .flat_map(|(filter, values)| values.where_in(filter.values()).ids())
            .collect();

        let aggregation_methods: Vec<AggregationMethod> = self
            .columns
            .iter()
            .filter_map(|c| {
                c.spec.aggregate().map(|method| AggregationMethod {
                    scope_id: c.scope.id,
                    method: method.to_string(),
                })
            })
            .collect();

        let query = TransactionQuery {
            aggregate: self.aggregate,
            select_scopes,
            intake_status: self.intake_status,
            filter_transaction_ids: self.filter_transaction_ids,
            filter_scope_values: (!filters.is_empty()).then_some(filters),
            aggregation_methods: (!aggregation_methods.is_empty()).then_some(aggregation_methods),
            start_date_time: self
                .start_date_time
                .map(|b| b.resolve("start_date_time"))
                .transpose()?,
            end_date_time: self
                .end_date_time
                .map(|b| b.resolve("end_date_time"))
                .transpose()?,
        };

        debug!(
            scopes = query.select_scopes.len(),
            filters = query.filter_scope_values.as_ref().map_or(0, Vec::len),
            "built transaction query"
        );

        Ok(query)
    }
}
