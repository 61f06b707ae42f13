//! reqwest binding of the `Backend` seam.
//!
//! Bearer-token authenticated JSON endpoints. The dataset-service base for a
//! dataset is either the configured override or discovered from the memoized
//! metadata listing of the user tool.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    Error,
    cache::MetadataCache,
    catalog::CatalogError,
    query::TransactionQuery,
    transport::{Backend, TransportError},
    types::{
        BusinessCell, Dataset, DatasetId, Page, Scope, ScopeId, ScopeValue, Transaction,
        TransactionSummary,
    },
};

/// Response envelope wrapping every listing body.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Paginated envelope of the transactions endpoint.
#[derive(Debug, Deserialize)]
struct PageEnvelope<T> {
    data: Vec<T>,
    current_page: u32,
    last_page: u32,
}

///
/// RestBackendConfig
///

#[derive(Clone, Debug)]
pub struct RestBackendConfig {
    pub bearer_token: String,

    /// Base URL of the user tool holding the dataset listing.
    pub users_base: String,

    /// Explicit dataset-service base; skips metadata discovery when set.
    pub dss_base: Option<String>,

    pub timeout: Duration,
}

///
/// RestBackend
///

pub struct RestBackend {
    http: reqwest::Client,
    bearer: String,
    users_base: String,
    dss_base: Option<String>,

    /// Discovery cache; shared with the plain `datasets()` listing so base
    /// discovery and the caller-facing listing cost one fetch together.
    meta: MetadataCache,
}

impl RestBackend {
    pub fn new(config: RestBackendConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            bearer: config.bearer_token,
            users_base: config.users_base,
            dss_base: config.dss_base,
            meta: MetadataCache::new(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TransportError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.bearer)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.bearer)
            .json(body)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
        let status = response.status();

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        Ok(response.json().await?)
    }

    async fn fetch_datasets(&self) -> Result<Vec<Dataset>, Error> {
        let url = format!("{}/api/datasets", self.users_base);
        debug!(%url, "fetching dataset listing");

        let envelope: Envelope<Vec<Dataset>> = self.get_json(&url).await?;
        Ok(envelope.data)
    }

    /// Dataset-service base for the dataset: override wins, otherwise the
    /// `dss_url` from the memoized metadata listing.
    async fn service_base(&self, dataset_id: DatasetId) -> Result<String, Error> {
        if let Some(base) = &self.dss_base {
            return Ok(base.clone());
        }

        let meta = self
            .meta
            .get_with(dataset_id, || self.fetch_datasets())
            .await?
            .ok_or(CatalogError::DatasetNotFound { id: dataset_id })?;

        Ok(meta.dss_url)
    }

    async fn cell_url(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
        tail: &str,
    ) -> Result<String, Error> {
        let base = self.service_base(dataset_id).await?;

        Ok(format!(
            "{base}/api/datasets/{dataset_id}/business_cells/{bc}/{tail}"
        ))
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn datasets(&self) -> Result<Vec<Dataset>, Error> {
        let datasets = self.meta.list_with(|| self.fetch_datasets()).await?;
        Ok((*datasets).clone())
    }

    async fn scopes(&self, dataset_id: DatasetId, bc: &BusinessCell) -> Result<Vec<Scope>, Error> {
        let url = self.cell_url(dataset_id, bc, "scopes").await?;
        let envelope: Envelope<Vec<Scope>> = self.get_json(&url).await?;

        Ok(envelope.data)
    }

    async fn scope_values(
        &self,
        dataset_id: DatasetId,
        scope_id: ScopeId,
        bc: &BusinessCell,
    ) -> Result<Vec<ScopeValue>, Error> {
        let url = self
            .cell_url(dataset_id, bc, &format!("scopes/{scope_id}/scope_values"))
            .await?;
        let envelope: Envelope<Vec<ScopeValue>> = self.get_json(&url).await?;

        Ok(envelope.data)
    }

    async fn transaction_summary(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
        intake_status: Option<&str>,
    ) -> Result<TransactionSummary, Error> {
        let mut url = self.cell_url(dataset_id, bc, "transactions/summary").await?;

        if let Some(status) = intake_status {
            url = format!("{url}?intake_status={status}");
        }

        let envelope: Envelope<TransactionSummary> = self.get_json(&url).await?;
        Ok(envelope.data)
    }

    async fn transactions_page(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
        query: &TransactionQuery,
        page: u32,
    ) -> Result<Page<Transaction>, Error> {
        let url = self
            .cell_url(dataset_id, bc, &format!("transactions?page={page}"))
            .await?;

        let envelope: PageEnvelope<Transaction> = self.post_json(&url, query).await?;
        Ok(into_page(envelope))
    }
}

fn into_page(envelope: PageEnvelope<Transaction>) -> Page<Transaction> {
    Page::new(
        envelope.data,
        envelope.current_page,
        envelope.current_page >= envelope.last_page,
    )
}
