//! Shared aliases and small value types.

use serde::{Deserialize, Serialize};

/// A backend record in its raw JSON form.
///
/// The admin client is generic over resources; records stay untyped and the
/// UI layer decides what to project out of them.
pub type Record = serde_json::Value;

/// A page of records plus the backend's total count across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    /// Records of the requested page, in backend order.
    pub data: Vec<Record>,
    /// Total number of records across all pages, from the count header.
    pub total: u64,
}
