//! Error types shared across the adapter crates.

use crate::query::FilterOperator;

/// Fail-fast errors raised while translating a query descriptor into
/// REST query parameters. Raised before any network request is built.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The operator name is not part of the known operator vocabulary.
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),

    /// The operator is recognized but the backend's query dialect has no
    /// way to express it.
    #[error("Operator `{0}` cannot be expressed as a query parameter")]
    UnsupportedOperator(FilterOperator),

    /// Pagination values outside the one-based window contract.
    #[error("Invalid pagination: page and page_size must be >= 1 (got page {page}, page_size {page_size})")]
    InvalidPagination {
        /// Requested page number.
        page: u32,
        /// Requested page size.
        page_size: u32,
    },
}

/// Errors from the durable session store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the durable session key failed.
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored session record could not be encoded or decoded.
    #[error("Session record serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Normalized shape of a transport-level failure.
///
/// Every HTTP failure is flattened to a message plus the response status
/// before it reaches adapter callers; raw client-library errors never cross
/// that boundary. `status_code` is `None` for network-level failures that
/// produced no response at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP {status_code:?}: {message}")]
pub struct HttpError {
    /// Human-readable description, taken from the response body when present.
    pub message: String,
    /// HTTP status of the failed response, if one was received.
    pub status_code: Option<u16>,
}

impl HttpError {
    /// True when the failure is an authorization failure (401 or 403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status_code, Some(401) | Some(403))
    }
}
