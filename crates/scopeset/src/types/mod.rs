//! Module: types
//! Responsibility: domain DTOs shared across the client surface.
//! Does not own: resolution, payload construction, or transport codecs.
//! Boundary: shapes mirror the remote service's JSON bodies.

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use derive_more::{Display, From, FromStr};
use serde::{Deserialize, Serialize};
use serde_json::Value;

///
/// DatasetId
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DatasetId(pub u64);

///
/// ScopeId
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ScopeId(pub u64);

///
/// ScopeValueId
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ScopeValueId(pub u64);

///
/// TransactionId
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TransactionId(pub u64);

///
/// BusinessCell
///
/// Partition selector for a dataset's scope/value catalog.
/// `All` is the sentinel meaning "no partitioning" and travels as `"all"`.
///

#[derive(Clone, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum BusinessCell {
    #[default]
    #[display("all")]
    All,

    #[display("{_0}")]
    Id(String),
}

impl BusinessCell {
    /// Path segment used when addressing the remote catalog.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Id(id) => id,
        }
    }
}

impl From<String> for BusinessCell {
    fn from(value: String) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Id(value)
        }
    }
}

impl From<&str> for BusinessCell {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<BusinessCell> for String {
    fn from(value: BusinessCell) -> Self {
        value.to_string()
    }
}

///
/// Dataset
/// Top-level dataset metadata. Immutable once fetched.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,

    /// Base address of the dataset-service instance holding this dataset.
    pub dss_url: String,

    pub created_at: DateTime<Utc>,
}

///
/// Scope
///
/// A named, typed dimension of a transaction within a dataset.
/// Immutable; owned by the scope catalog for the instance's lifetime.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Scope {
    pub id: ScopeId,

    /// Symbolic representation, when the dataset assigns one.
    #[serde(default)]
    pub representation: Option<String>,

    /// Dataset-native column name.
    pub name_dataset: String,

    /// Human-readable display name.
    #[serde(default)]
    pub name_human: Option<String>,

    #[serde(default, rename = "type")]
    pub scope_type: Option<String>,
}

///
/// ScopeValue
/// One concrete value a scope can take. Fetched on demand, never cached.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScopeValue {
    pub id: ScopeValueId,
    pub scope_id: ScopeId,
    pub value: String,
}

///
/// TransactionCell
/// One per-scope cell of a raw transaction record.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TransactionCell {
    pub scope_id: ScopeId,
    pub value: Value,
}

///
/// Transaction
///
/// Raw transaction record as returned by the dataset service. Aggregated
/// records carry no id of their own.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<TransactionId>,

    #[serde(default)]
    pub scope_values: Vec<TransactionCell>,
}

impl Transaction {
    /// Value this record carries for the given scope, if any.
    #[must_use]
    pub fn value_of(&self, scope_id: ScopeId) -> Option<&Value> {
        self.scope_values
            .iter()
            .find(|cell| cell.scope_id == scope_id)
            .map(|cell| &cell.value)
    }
}

///
/// TransactionSummary
/// First and last transaction timestamps of a dataset (or intake).
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TransactionSummary {
    #[serde(default)]
    pub first_date_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_date_time: Option<DateTime<Utc>>,
}

///
/// Page
/// One batch of records from the paginated transactions endpoint.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,

    /// 1-based page number.
    pub number: u32,

    /// True when this is the final page of the result set.
    pub is_last: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(records: Vec<T>, number: u32, is_last: bool) -> Self {
        Self {
            records,
            number,
            is_last,
        }
    }
}
