//! Module: catalog
//! Responsibility: scope catalog and scope-value resolution.
//! Does not own: payload construction or pagination.
//! Boundary: one underlying listing call per `(dataset, business cell)` pair;
//! resolution is pure with respect to the fetched scope set.


use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use thiserror::Error as ThisError;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    Error,
    column::{ColumnSpec, ScopeSelector},
    transport::Backend,
    types::{BusinessCell, DatasetId, Scope, ScopeId, ScopeValue, ScopeValueId},
};

///
/// CatalogError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CatalogError {
    #[error("no scope matches {selector}")]
    ScopeNotFound { selector: ScopeSelector },

    #[error("dataset {id} is not present in the metadata listing")]
    DatasetNotFound { id: DatasetId },
}

///
/// ScopeCollection
/// Immutable scope set fetched for one `(dataset, business cell)` pair.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeCollection {
    scopes: Vec<Scope>,
}

impl ScopeCollection {
    #[must_use]
    pub const fn new(scopes: Vec<Scope>) -> Self {
        Self { scopes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    #[must_use]
    pub fn find_by_id(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn find_by_representation(&self, representation: &str) -> Option<&Scope> {
        self.scopes
            .iter()
            .find(|s| s.representation.as_deref() == Some(representation))
    }

    #[must_use]
    pub fn find_by_name_dataset(&self, name: &str) -> Option<&Scope> {
        self.scopes.iter().find(|s| s.name_dataset == name)
    }

    /// Resolve a selector to exactly one scope, or fail with a lookup miss.
    pub fn resolve(&self, selector: &ScopeSelector) -> Result<&Scope, CatalogError> {
        let found = match selector {
            ScopeSelector::ScopeId(id) => self.find_by_id(*id),
            ScopeSelector::Representation(repr) => self.find_by_representation(repr),
            ScopeSelector::NameDataset(name) => self.find_by_name_dataset(name),
        };

        found.ok_or_else(|| CatalogError::ScopeNotFound {
            selector: selector.clone(),
        })
    }
}

///
/// ScopeValueCollection
/// Value set fetched for one scope. Not cached beyond the requesting call.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeValueCollection {
    values: Vec<ScopeValue>,
}

impl ScopeValueCollection {
    #[must_use]
    pub const fn new(values: Vec<ScopeValue>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeValue> {
        self.values.iter()
    }

    /// Values whose literal is a member of the given filter set.
    ///
    /// String filter values compare against the literal directly; other JSON
    /// values compare via their canonical JSON text.
    #[must_use]
    pub fn where_in(&self, filter: &[Value]) -> Self {
        let wanted: Vec<String> = filter.iter().map(literal).collect();

        Self::new(
            self.values
                .iter()
                .filter(|v| wanted.iter().any(|w| *w == v.value))
                .cloned()
                .collect(),
        )
    }

    /// Pluck the value identifiers, in fetched order.
    #[must_use]
    pub fn ids(&self) -> Vec<ScopeValueId> {
        self.values.iter().map(|v| v.id).collect()
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

///
/// ResolvedColumn
///
/// A column specification plus its resolved scope and, when the column
/// declared a filter, the fetched scope values for that scope.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedColumn {
    pub spec: ColumnSpec,
    pub scope: Scope,
    pub scope_values: Option<ScopeValueCollection>,
}

impl ResolvedColumn {
    #[must_use]
    pub const fn new(spec: ColumnSpec, scope: Scope) -> Self {
        Self {
            spec,
            scope,
            scope_values: None,
        }
    }

    #[must_use]
    pub fn with_values(mut self, values: ScopeValueCollection) -> Self {
        self.scope_values = Some(values);
        self
    }
}

///
/// ScopeCatalog
///
/// Memoized index of scope collections, one per `(dataset, business cell)`
/// pair, living for the owning instance's lifetime.
///

pub struct ScopeCatalog {
    backend: Arc<dyn Backend>,
    cache: Mutex<HashMap<(DatasetId, BusinessCell), Arc<ScopeCollection>>>,
}

impl ScopeCatalog {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Scope collection for the pair, fetching at most once per pair.
    ///
    /// The cache lock is held across the fetch so concurrent callers for the
    /// same pair still trigger a single listing call.
    pub async fn scopes(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
    ) -> Result<Arc<ScopeCollection>, Error> {
        let mut cache = self.cache.lock().await;

        if let Some(scopes) = cache.get(&(dataset_id, bc.clone())) {
            return Ok(Arc::clone(scopes));
        }

        debug!(dataset = %dataset_id, business_cell = %bc, "fetching scope listing");
        let scopes = Arc::new(ScopeCollection::new(
            self.backend.scopes(dataset_id, bc).await?,
        ));
        cache.insert((dataset_id, bc.clone()), Arc::clone(&scopes));

        Ok(scopes)
    }

    /// Resolve every column against the memoized scope collection.
    ///
    /// Fails on the first column that matches no scope; no partial output.
    pub async fn resolve_columns(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
        columns: &[ColumnSpec],
    ) -> Result<Vec<ResolvedColumn>, Error> {
        let scopes = self.scopes(dataset_id, bc).await?;

        columns
            .iter()
            .map(|spec| {
                let scope = scopes.resolve(spec.selector())?.clone();
                Ok(ResolvedColumn::new(spec.clone(), scope))
            })
            .collect()
    }
}
