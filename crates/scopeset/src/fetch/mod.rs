//! Module: fetch
//! Responsibility: drive the paginated transaction query and the per-page
//! notification side channel.
//! Does not own: payload construction or row-key mapping decisions.
//! Boundary: sink dispatch is spawned and never awaited by the page loop;
//! spawned handles are retained so callers can drain them before teardown.


use std::{future::Future, pin::Pin, sync::Arc};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    Error,
    query::{ScopeKeyMap, TransactionQuery},
    table::Table,
    transport::Backend,
    types::{BusinessCell, DatasetId, Transaction},
};

/// Boxed future produced by one sink invocation.
pub type SinkFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Per-page notification sink: `(page rows, page number, is last page)`.
///
/// The sink receives already-assembled rows, never raw records. Invocations
/// are spawned fire-and-forget; a slow or failing sink cannot block or abort
/// the remaining pagination.
pub type PageSink = Arc<dyn Fn(Table, u32, bool) -> SinkFuture + Send + Sync>;

/// Wrap an async closure into a [`PageSink`].
pub fn page_sink<F, Fut>(sink: F) -> PageSink
where
    F: Fn(Table, u32, bool) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |table, page, is_last| Box::pin(sink(table, page, is_last)))
}

///
/// Notifications
///
/// Handles of the spawned per-page notifications. Dropping this abandons
/// whatever is still in flight; `join_all` drains them. Notification
/// failures stay isolated either way.
///

#[derive(Debug, Default)]
pub struct Notifications {
    handles: Vec<JoinHandle<()>>,
}

impl Notifications {
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Await every outstanding notification; panicked sinks are ignored.
    pub async fn join_all(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }

    /// Abort whatever is still in flight.
    pub fn abort_all(self) {
        for handle in self.handles {
            handle.abort();
        }
    }
}

///
/// TransactionsResult
///
/// The assembled table from the complete record set, plus the retained
/// notification handles. The table is never an accumulation of the per-page
/// notifications; those exist purely as a progress side channel.
///

#[derive(Debug)]
pub struct TransactionsResult {
    pub table: Table,
    pub notifications: Notifications,
}

///
/// PaginatedFetcher
///

pub struct PaginatedFetcher {
    backend: Arc<dyn Backend>,
    dataset_id: DatasetId,
    bc: BusinessCell,
    keys: ScopeKeyMap,
    sink: Option<PageSink>,
}

impl PaginatedFetcher {
    #[must_use]
    pub const fn new(
        backend: Arc<dyn Backend>,
        dataset_id: DatasetId,
        bc: BusinessCell,
        keys: ScopeKeyMap,
        sink: Option<PageSink>,
    ) -> Self {
        Self {
            backend,
            dataset_id,
            bc,
            keys,
            sink,
        }
    }

    /// Fetch every page, dispatching each page's assembled rows to the sink
    /// without awaiting it, and assemble the final table from the complete
    /// ordered record set.
    ///
    /// A transport failure aborts the whole fetch; no partial table.
    pub async fn fetch(&self, query: &TransactionQuery) -> Result<TransactionsResult, Error> {
        let mut records: Vec<Transaction> = Vec::new();
        let mut handles = Vec::new();
        let mut page_nr = 1u32;

        loop {
            let page = self
                .backend
                .transactions_page(self.dataset_id, &self.bc, query, page_nr)
                .await?;

            debug!(
                page = page.number,
                is_last = page.is_last,
                rows = page.records.len(),
                "received transaction page"
            );

            if let Some(sink) = &self.sink {
                let rows = Table::assemble(&page.records, &self.keys);
                handles.push(tokio::spawn(sink(rows, page.number, page.is_last)));
            }

            let is_last = page.is_last;
            records.extend(page.records);

            if is_last {
                break;
            }
            page_nr += 1;
        }

        debug!(total = records.len(), "assembling final table");

        Ok(TransactionsResult {
            table: Table::assemble(&records, &self.keys),
            notifications: Notifications { handles },
        })
    }
}
