//! Module: transport
//! Responsibility: the opaque REST collaborator the pipeline talks through.
//! Does not own: retries, backoff, or response schema validation beyond the
//! structural envelope shapes.
//! Boundary: `Backend` is the seam; `RestBackend` is the reqwest binding.

mod rest;

use async_trait::async_trait;
use thiserror::Error as ThisError;

use crate::{
    Error,
    query::TransactionQuery,
    types::{
        BusinessCell, Dataset, DatasetId, Page, Scope, ScopeId, ScopeValue, Transaction,
        TransactionSummary,
    },
};

pub use rest::{RestBackend, RestBackendConfig};

///
/// TransportError
/// Propagated unchanged from the HTTP collaborator; no retry at this layer.
///

#[derive(Debug, ThisError)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote returned status {status} for {url}")]
    Status { status: u16, url: String },
}

///
/// Backend
///
/// Remote operations the query layer depends on. One implementation binds
/// reqwest; tests substitute an in-memory fake.
///

#[async_trait]
pub trait Backend: Send + Sync {
    /// Top-level dataset listing from the user tool.
    async fn datasets(&self) -> Result<Vec<Dataset>, Error>;

    /// Scope listing for one `(dataset, business cell)` pair.
    async fn scopes(&self, dataset_id: DatasetId, bc: &BusinessCell) -> Result<Vec<Scope>, Error>;

    /// Value listing for one scope.
    async fn scope_values(
        &self,
        dataset_id: DatasetId,
        scope_id: ScopeId,
        bc: &BusinessCell,
    ) -> Result<Vec<ScopeValue>, Error>;

    /// Transaction summary, optionally pinned to an intake status.
    async fn transaction_summary(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
        intake_status: Option<&str>,
    ) -> Result<TransactionSummary, Error>;

    /// One page of the paginated transaction query. Pages are 1-based.
    async fn transactions_page(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
        query: &TransactionQuery,
        page: u32,
    ) -> Result<Page<Transaction>, Error>;
}
