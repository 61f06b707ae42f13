//! Shared fixtures for unit tests: fixture constructors plus an in-memory
//! `Backend` with per-operation call counters.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::{
    Error,
    query::TransactionQuery,
    transport::{Backend, TransportError},
    types::{
        BusinessCell, Dataset, DatasetId, Page, Scope, ScopeId, ScopeValue, ScopeValueId,
        Transaction, TransactionCell, TransactionSummary,
    },
};

pub fn dataset(id: u64, dss_url: &str) -> Dataset {
    Dataset {
        id: DatasetId(id),
        name: format!("dataset-{id}"),
        dss_url: dss_url.to_string(),
        created_at: Utc::now(),
    }
}

pub fn scope(id: u64, representation: Option<&str>, name_dataset: &str) -> Scope {
    Scope {
        id: ScopeId(id),
        representation: representation.map(str::to_string),
        name_dataset: name_dataset.to_string(),
        name_human: None,
        scope_type: None,
    }
}

pub fn scope_value(id: u64, scope_id: u64, value: &str) -> ScopeValue {
    ScopeValue {
        id: ScopeValueId(id),
        scope_id: ScopeId(scope_id),
        value: value.to_string(),
    }
}

pub fn transaction(cells: &[(u64, Value)]) -> Transaction {
    Transaction {
        id: None,
        scope_values: cells
            .iter()
            .map(|(scope_id, value)| TransactionCell {
                scope_id: ScopeId(*scope_id),
                value: value.clone(),
            })
            .collect(),
    }
}

///
/// FakeBackend
///
/// In-memory backend: canned scopes, values, and transaction pages, with
/// call counters and capture of the last received query payload.
///

#[derive(Default)]
pub struct FakeBackend {
    pub datasets: Vec<Dataset>,
    pub scopes: Vec<Scope>,
    pub scope_values: Vec<ScopeValue>,

    /// Pages served in order; the last one is marked final.
    pub pages: Vec<Vec<Transaction>>,

    pub datasets_calls: AtomicUsize,
    pub scopes_calls: AtomicUsize,
    pub scope_values_calls: AtomicUsize,
    pub page_calls: AtomicUsize,

    pub seen_query: Mutex<Option<TransactionQuery>>,
    pub fail_pages: bool,
}

impl FakeBackend {
    pub fn with_scopes(scopes: Vec<Scope>) -> Self {
        Self {
            scopes,
            ..Self::default()
        }
    }

    pub fn last_query(&self) -> Option<TransactionQuery> {
        self.seen_query.lock().expect("query lock").clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn datasets(&self) -> Result<Vec<Dataset>, Error> {
        self.datasets_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.datasets.clone())
    }

    async fn scopes(&self, _dataset_id: DatasetId, _bc: &BusinessCell) -> Result<Vec<Scope>, Error> {
        self.scopes_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.scopes.clone())
    }

    async fn scope_values(
        &self,
        _dataset_id: DatasetId,
        scope_id: ScopeId,
        _bc: &BusinessCell,
    ) -> Result<Vec<ScopeValue>, Error> {
        self.scope_values_calls.fetch_add(1, Ordering::SeqCst);

        Ok(self
            .scope_values
            .iter()
            .filter(|v| v.scope_id == scope_id)
            .cloned()
            .collect())
    }

    async fn transaction_summary(
        &self,
        _dataset_id: DatasetId,
        _bc: &BusinessCell,
        _intake_status: Option<&str>,
    ) -> Result<TransactionSummary, Error> {
        Ok(TransactionSummary {
            first_date_time: None,
            last_date_time: None,
        })
    }

    async fn transactions_page(
        &self,
        _dataset_id: DatasetId,
        _bc: &BusinessCell,
        query: &TransactionQuery,
        page: u32,
    ) -> Result<Page<Transaction>, Error> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_query.lock().expect("query lock") = Some(query.clone());

        if self.fail_pages {
            return Err(TransportError::Status {
                status: 500,
                url: "fake://transactions".to_string(),
            }
            .into());
        }

        let index = (page - 1) as usize;
        let records = self.pages.get(index).cloned().unwrap_or_default();
        let last = self.pages.len().max(1) as u32;

        Ok(Page::new(records, page, page >= last))
    }
}
