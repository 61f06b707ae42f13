//! Session-scoped memoization of the top-level dataset listing.
//!
//! Single-fetch-then-frozen: the first successful `list_with` call fetches,
//! every later call (and every `get_with`) reuses the memoized listing. There
//! is no invalidation; the cache lives and dies with the owning instance.

use std::{future::Future, sync::Arc};

use tokio::sync::OnceCell;

use crate::{
    Error,
    types::{Dataset, DatasetId},
};

///
/// MetadataCache
///

#[derive(Debug, Default)]
pub struct MetadataCache {
    datasets: OnceCell<Arc<Vec<Dataset>>>,
}

impl MetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized dataset listing; `fetch` runs at most once per instance,
    /// concurrent first callers included.
    pub async fn list_with<F, Fut>(&self, fetch: F) -> Result<Arc<Vec<Dataset>>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Dataset>, Error>>,
    {
        let datasets = self
            .datasets
            .get_or_try_init(|| async { fetch().await.map(Arc::new) })
            .await?;

        Ok(Arc::clone(datasets))
    }

    /// Dataset metadata by id, from the memoized listing.
    pub async fn get_with<F, Fut>(
        &self,
        id: DatasetId,
        fetch: F,
    ) -> Result<Option<Dataset>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Dataset>, Error>>,
    {
        Ok(self
            .list_with(fetch)
            .await?
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }
}
