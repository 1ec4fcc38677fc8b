//! HTTP transport and the generic REST data provider.
//!
//! - [`transport`] -- request execution, error normalization, and the
//!   refresh-token-on-401 interceptor.
//! - [`rest`] -- the [`DataProvider`](pressroom_core::provider::DataProvider)
//!   implementation translating query descriptors into REST requests.
//! - [`error`] -- the normalized client error type.

pub mod error;
pub mod rest;
pub mod transport;

pub use error::ClientError;
pub use rest::RestDataProvider;
pub use transport::{HttpTransport, RequestSpec};
