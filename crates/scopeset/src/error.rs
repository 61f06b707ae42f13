//! Module: error
//! Responsibility: public error taxonomy for the client surface.
//! Boundary: module-level errors fold into `Error` via `From`.

use thiserror::Error as ThisError;

use crate::{catalog::CatalogError, transport::TransportError};

///
/// SpecError
///
/// A caller-supplied specification is invalid. Raised synchronously,
/// before any network request is issued.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SpecError {
    #[error(
        "expected exactly one of `scope_id`, `representation` or `name_dataset`, found {found}"
    )]
    SelectorCount { found: usize },

    #[error("`{field}` is not a well-formed RFC 3339 timestamp: {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },
}

///
/// Error
/// Top-level error type returned by every fallible client operation.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    /// True when the failure was detected before any request was sent.
    #[must_use]
    pub const fn is_spec(&self) -> bool {
        matches!(self, Self::Spec(_))
    }
}
