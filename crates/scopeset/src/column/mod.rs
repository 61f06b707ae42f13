//! Module: column
//! Responsibility: caller-facing column specifications.
//! Does not own: scope resolution or payload construction.
//! Boundary: the duck-typed caller form (`RawColumnSpec`) is validated into
//! `ColumnSpec` at construction time; invalid selector combinations are
//! unrepresentable afterwards.

#[cfg(test)]
mod tests;

use derive_more::Display;
use serde::Deserialize;
use serde_json::Value;

use crate::{error::SpecError, types::ScopeId};

///
/// ScopeSelector
///
/// Exactly one way of naming a scope. The exactly-one invariant of the
/// caller input is structural here.
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ScopeSelector {
    #[display("scope_id {_0}")]
    ScopeId(ScopeId),

    #[display("representation {_0:?}")]
    Representation(String),

    #[display("name_dataset {_0:?}")]
    NameDataset(String),
}

///
/// ColumnFilter
///
/// Value filter for one column. Callers may pass a single value or a set;
/// both normalize to a slice view. Variant order matters for the untagged
/// deserialization: arrays must match `Many` before `One` swallows them.
///

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColumnFilter {
    Many(Vec<Value>),
    One(Value),
}

impl ColumnFilter {
    /// Normalized view of the filter values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Many(values) => values,
            Self::One(value) => std::slice::from_ref(value),
        }
    }
}

impl From<Value> for ColumnFilter {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Value>> for ColumnFilter {
    fn from(values: Vec<Value>) -> Self {
        Self::Many(values)
    }
}

impl From<&str> for ColumnFilter {
    fn from(value: &str) -> Self {
        Self::One(Value::String(value.to_string()))
    }
}

impl From<Vec<&str>> for ColumnFilter {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(
            values
                .into_iter()
                .map(|v| Value::String(v.to_string()))
                .collect(),
        )
    }
}

///
/// ColumnSpec
///
/// One desired output column: a scope selector plus optional filter,
/// aggregation method, and output key.
///

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "RawColumnSpec")]
pub struct ColumnSpec {
    selector: ScopeSelector,
    filter: Option<ColumnFilter>,
    aggregate: Option<String>,
    key: Option<String>,
}

impl ColumnSpec {
    #[must_use]
    pub const fn new(selector: ScopeSelector) -> Self {
        Self {
            selector,
            filter: None,
            aggregate: None,
            key: None,
        }
    }

    /// Select by scope identifier.
    #[must_use]
    pub fn by_id(id: impl Into<ScopeId>) -> Self {
        Self::new(ScopeSelector::ScopeId(id.into()))
    }

    /// Select by symbolic representation.
    #[must_use]
    pub fn by_representation(representation: impl Into<String>) -> Self {
        Self::new(ScopeSelector::Representation(representation.into()))
    }

    /// Select by dataset-native name.
    #[must_use]
    pub fn by_name_dataset(name: impl Into<String>) -> Self {
        Self::new(ScopeSelector::NameDataset(name.into()))
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<ColumnFilter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Aggregation method delegated to the remote side (e.g. `"sum"`).
    #[must_use]
    pub fn with_aggregate(mut self, method: impl Into<String>) -> Self {
        self.aggregate = Some(method.into());
        self
    }

    /// Output column name. Defaults to `scope_<id>` when unset.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub const fn selector(&self) -> &ScopeSelector {
        &self.selector
    }

    #[must_use]
    pub const fn filter(&self) -> Option<&ColumnFilter> {
        self.filter.as_ref()
    }

    #[must_use]
    pub fn aggregate(&self) -> Option<&str> {
        self.aggregate.as_deref()
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

///
/// RawColumnSpec
///
/// The caller-facing dictionary form. Carries every field as optional and
/// is validated exhaustively when converted into a `ColumnSpec`.
///

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawColumnSpec {
    #[serde(default)]
    pub scope_id: Option<ScopeId>,

    #[serde(default)]
    pub representation: Option<String>,

    #[serde(default)]
    pub name_dataset: Option<String>,

    #[serde(default)]
    pub filter: Option<ColumnFilter>,

    #[serde(default)]
    pub aggregate: Option<String>,

    #[serde(default)]
    pub key: Option<String>,
}

impl TryFrom<RawColumnSpec> for ColumnSpec {
    type Error = SpecError;

    fn try_from(raw: RawColumnSpec) -> Result<Self, Self::Error> {
        let found = usize::from(raw.scope_id.is_some())
            + usize::from(raw.representation.is_some())
            + usize::from(raw.name_dataset.is_some());

        if found != 1 {
            return Err(SpecError::SelectorCount { found });
        }

        let selector = if let Some(id) = raw.scope_id {
            ScopeSelector::ScopeId(id)
        } else if let Some(representation) = raw.representation {
            ScopeSelector::Representation(representation)
        } else {
            // Guarded by the count above.
            ScopeSelector::NameDataset(raw.name_dataset.unwrap_or_default())
        };

        Ok(Self {
            selector,
            filter: raw.filter,
            aggregate: raw.aggregate,
            key: raw.key,
        })
    }
}
