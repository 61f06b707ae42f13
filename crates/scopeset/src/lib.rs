//! scopeset — async client SDK for scope-indexed transaction dataset
//! services.
//!
//! ## Crate layout
//! - `types`: domain DTOs (datasets, scopes, scope values, transactions).
//! - `column`: caller-facing column specifications, validated at construction.
//! - `catalog`: memoized scope catalog and scope-value resolution.
//! - `query`: request-payload construction with fail-fast validation.
//! - `fetch`: paginated retrieval with a spawned per-page side channel.
//! - `table`: row assembly into the final tabular result.
//! - `cache`: session-scoped metadata memoization.
//! - `transport`: the `Backend` seam and its reqwest binding.
//! - `client`: the `Datasets` facade tying the pipeline together.
//!
//! The `prelude` module mirrors the surface a typical caller needs.

pub mod cache;
pub mod catalog;
pub mod client;
pub mod column;
pub mod error;
pub mod fetch;
pub mod query;
pub mod table;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        client::{ClientOptions, Datasets, TransactionRequest},
        column::{ColumnFilter, ColumnSpec, ScopeSelector},
        error::{Error, SpecError},
        fetch::{Notifications, PageSink, TransactionsResult, page_sink},
        query::{TimeBound, TransactionQuery},
        table::Table,
        types::{
            BusinessCell, Dataset, DatasetId, Scope, ScopeId, ScopeValue, ScopeValueId,
            Transaction, TransactionId, TransactionSummary,
        },
    };
}
