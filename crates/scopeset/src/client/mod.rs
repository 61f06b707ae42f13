//! Module: client
//! Responsibility: the caller-facing facade over the full pipeline.
//! Boundary: resolve columns → build the payload → fetch pages → assemble;
//! every network operation goes through the `Backend` seam.


use std::{sync::Arc, time::Duration};

use tracing::debug;

use crate::{
    Error,
    cache::MetadataCache,
    catalog::{ScopeCatalog, ScopeCollection, ScopeValueCollection},
    column::ColumnSpec,
    fetch::{PageSink, PaginatedFetcher, TransactionsResult},
    query::{QueryBuilder, ScopeKeyMap, TimeBound},
    transport::{Backend, RestBackend, RestBackendConfig},
    types::{BusinessCell, Dataset, DatasetId, ScopeId, TransactionId, TransactionSummary},
};

/// Default base URL of the user tool holding the dataset listing.
pub const DEFAULT_USERS_BASE: &str = "https://users.scopeset.dev";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

///
/// ClientOptions
///

#[derive(Clone, Debug)]
pub struct ClientOptions {
    users_base: String,
    dss_base: Option<String>,
    default_intake_status: Option<String>,
    timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            users_base: DEFAULT_USERS_BASE.to_string(),
            dss_base: None,
            default_intake_status: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the user-tool base URL.
    #[must_use]
    pub fn users_base(mut self, base: impl Into<String>) -> Self {
        self.users_base = base.into();
        self
    }

    /// Skip metadata discovery and address this dataset-service base.
    #[must_use]
    pub fn dss_base(mut self, base: impl Into<String>) -> Self {
        self.dss_base = Some(base.into());
        self
    }

    /// Intake status used when a request specifies none.
    #[must_use]
    pub fn default_intake_status(mut self, status: impl Into<String>) -> Self {
        self.default_intake_status = Some(status.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

///
/// TransactionRequest
///
/// Everything one `get_transactions` call needs: the aggregate flag, the
/// ordered column list, and the independent optional directives.
///

pub struct TransactionRequest {
    pub aggregate: bool,
    pub columns: Vec<ColumnSpec>,
    pub business_cell: BusinessCell,
    pub start_date_time: Option<TimeBound>,
    pub end_date_time: Option<TimeBound>,
    pub intake_status: Option<String>,
    pub filter_transaction_ids: Option<Vec<TransactionId>>,
    pub page_sink: Option<PageSink>,
}

impl TransactionRequest {
    #[must_use]
    pub fn new(aggregate: bool, columns: Vec<ColumnSpec>) -> Self {
        Self {
            aggregate,
            columns,
            business_cell: BusinessCell::All,
            start_date_time: None,
            end_date_time: None,
            intake_status: None,
            filter_transaction_ids: None,
            page_sink: None,
        }
    }

    #[must_use]
    pub fn business_cell(mut self, bc: impl Into<BusinessCell>) -> Self {
        self.business_cell = bc.into();
        self
    }

    #[must_use]
    pub fn start_date_time(mut self, bound: impl Into<TimeBound>) -> Self {
        self.start_date_time = Some(bound.into());
        self
    }

    #[must_use]
    pub fn end_date_time(mut self, bound: impl Into<TimeBound>) -> Self {
        self.end_date_time = Some(bound.into());
        self
    }

    #[must_use]
    pub fn intake_status(mut self, status: impl Into<String>) -> Self {
        self.intake_status = Some(status.into());
        self
    }

    #[must_use]
    pub fn filter_transaction_ids(mut self, ids: Vec<TransactionId>) -> Self {
        self.filter_transaction_ids = Some(ids);
        self
    }

    /// Per-page notification sink; see [`crate::fetch::page_sink`].
    #[must_use]
    pub fn page_sink(mut self, sink: PageSink) -> Self {
        self.page_sink = Some(sink);
        self
    }
}

///
/// Datasets
///
/// Client facade exposing the available dataset operations: listing
/// datasets, listing scopes and scope values, fetching the transaction
/// summary, and the resolve-build-fetch-assemble transaction pipeline.
///

pub struct Datasets {
    backend: Arc<dyn Backend>,
    meta: MetadataCache,
    catalog: ScopeCatalog,
    default_intake_status: Option<String>,
}

impl Datasets {
    /// Connect with a bearer token and the given options.
    pub fn new(bearer_token: impl Into<String>, options: ClientOptions) -> Result<Self, Error> {
        let backend = RestBackend::new(RestBackendConfig {
            bearer_token: bearer_token.into(),
            users_base: options.users_base,
            dss_base: options.dss_base,
            timeout: options.timeout,
        })
        .map_err(Error::from)?;

        Ok(Self::with_backend(
            Arc::new(backend),
            options.default_intake_status,
        ))
    }

    /// Build the facade over an arbitrary backend implementation.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn Backend>, default_intake_status: Option<String>) -> Self {
        Self {
            meta: MetadataCache::new(),
            catalog: ScopeCatalog::new(Arc::clone(&backend)),
            backend,
            default_intake_status,
        }
    }

    /// List all available datasets. Memoized for this instance's lifetime.
    pub async fn index(&self) -> Result<Arc<Vec<Dataset>>, Error> {
        self.meta.list_with(|| self.backend.datasets()).await
    }

    /// Metadata of one dataset, from the memoized listing.
    pub async fn get_meta(&self, dataset_id: DatasetId) -> Result<Option<Dataset>, Error> {
        self.meta
            .get_with(dataset_id, || self.backend.datasets())
            .await
    }

    /// All scopes of the dataset, memoized per `(dataset, business cell)`.
    pub async fn get_scopes(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
    ) -> Result<Arc<ScopeCollection>, Error> {
        self.catalog.scopes(dataset_id, bc).await
    }

    /// All values of one scope. Fetched on demand, never cached.
    pub async fn get_scope_values(
        &self,
        dataset_id: DatasetId,
        scope_id: ScopeId,
        bc: &BusinessCell,
    ) -> Result<ScopeValueCollection, Error> {
        Ok(ScopeValueCollection::new(
            self.backend.scope_values(dataset_id, scope_id, bc).await?,
        ))
    }

    /// Summary of the transactions (first and last transaction dates).
    pub async fn get_transaction_summary(
        &self,
        dataset_id: DatasetId,
        bc: &BusinessCell,
        intake_status: Option<&str>,
    ) -> Result<TransactionSummary, Error> {
        let status = intake_status.or(self.default_intake_status.as_deref());

        self.backend
            .transaction_summary(dataset_id, bc, status)
            .await
    }

    /// Fetch transactions as a table, per the request's column
    /// specifications, filters, aggregation directives, and time window.
    pub async fn get_transactions(
        &self,
        dataset_id: DatasetId,
        request: TransactionRequest,
    ) -> Result<TransactionsResult, Error> {
        let bc = request.business_cell;

        let mut resolved = self
            .catalog
            .resolve_columns(dataset_id, &bc, &request.columns)
            .await?;

        // Scope values are fetched only for columns carrying a filter, once
        // per such column regardless of filter cardinality.
        // TODO only fetch the scope values that are included in the filters.
        for column in &mut resolved {
            if column.spec.filter().is_some() {
                let values = self
                    .get_scope_values(dataset_id, column.scope.id, &bc)
                    .await?;
                column.scope_values = Some(values);
            }
        }

        let keys = ScopeKeyMap::from_columns(&resolved);

        let query = QueryBuilder::new(request.aggregate, &resolved)
            .intake_status(
                request
                    .intake_status
                    .or_else(|| self.default_intake_status.clone()),
            )
            .filter_transaction_ids(request.filter_transaction_ids)
            .start_date_time(request.start_date_time)
            .end_date_time(request.end_date_time)
            .build()?;

        debug!(dataset = %dataset_id, business_cell = %bc, "starting paginated fetch");

        PaginatedFetcher::new(
            Arc::clone(&self.backend),
            dataset_id,
            bc,
            keys,
            request.page_sink,
        )
        .fetch(&query)
        .await
    }
}
