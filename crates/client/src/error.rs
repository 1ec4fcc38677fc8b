//! Normalized client error type.

use pressroom_core::error::{HttpError, QueryError, StoreError};

/// Errors from the transport and the REST provider.
///
/// HTTP failures reach callers in normalized form: the response status plus
/// a message extracted from the response body. The raw client-library error
/// shape only appears for network-level failures that produced no response.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the failed response.
        status: u16,
        /// Message from the response body, or the status reason.
        message: String,
    },

    /// The request itself failed (connect, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The total-count header was present but not a number.
    #[error("Invalid x-total-count header: {raw:?}")]
    TotalCount {
        /// Raw header value as received.
        raw: String,
    },

    /// The query descriptor could not be translated. No request was sent.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Reading or writing the session store failed mid-request.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// HTTP status of the failure, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Flatten into the normalized [`HttpError`] shape the auth adapter
    /// classifies on.
    pub fn to_http_error(&self) -> HttpError {
        HttpError {
            message: self.to_string(),
            status_code: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_carry_their_status_through_normalization() {
        let error = ClientError::Api {
            status: 403,
            message: "forbidden".into(),
        };
        let http = error.to_http_error();
        assert_eq!(http.status_code, Some(403));
        assert!(http.is_auth_failure());
    }

    #[test]
    fn query_errors_have_no_status() {
        let error = ClientError::Query(QueryError::InvalidPagination {
            page: 0,
            page_size: 10,
        });
        assert_eq!(error.status(), None);
        assert!(!error.to_http_error().is_auth_failure());
    }
}
