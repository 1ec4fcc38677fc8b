//! Query descriptors and their REST query-string translation.
//!
//! The backend speaks a json-server style dialect: `_start`/`_end` mark a
//! half-open record window, `_sort`/`_order` name a single sort column, and
//! filters become `{field}{suffix}` parameters (`title_like=rust`,
//! `status=published`). Translation is fail-fast: anything the dialect cannot
//! express surfaces as a [`QueryError`] before a request is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// One-based page window for list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page number, starting at 1.
    pub page: u32,
    /// Records per page, at least 1.
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl Pagination {
    /// Build a window, failing fast on a zero page or page size.
    pub fn new(page: u32, page_size: u32) -> Result<Self, QueryError> {
        let pagination = Self { page, page_size };
        pagination.validate()?;
        Ok(pagination)
    }

    /// Check the one-based window contract.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page == 0 || self.page_size == 0 {
            return Err(QueryError::InvalidPagination {
                page: self.page,
                page_size: self.page_size,
            });
        }
        Ok(())
    }

    /// First record index of the half-open range `[start, end)`.
    pub fn start(&self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.page_size)
    }

    /// One-past-last record index of the half-open range `[start, end)`.
    pub fn end(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort direction, serialized as `asc` / `desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// A (field, direction) pair controlling list ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorter {
    /// Field to sort by.
    pub field: String,
    /// Direction of the sort.
    pub order: SortOrder,
}

impl Sorter {
    /// Convenience constructor.
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Closed set of filter operators understood by the client.
///
/// The set is fixed: operator *names* outside it fail at parse time, and
/// recognized operators the backend dialect cannot express fail at
/// serialization time. Neither case ever degrades to an unfiltered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    In,
    Nin,
    Contains,
    Ncontains,
    Containss,
    Ncontainss,
    Null,
    Nnull,
}

impl FilterOperator {
    /// Query-parameter suffix appended to the filtered field name.
    ///
    /// Equality has no suffix (`status=published`); the case-sensitive
    /// contains variants and the null checks have no representation in this
    /// backend's dialect and are rejected.
    pub fn suffix(&self) -> Result<&'static str, QueryError> {
        match self {
            FilterOperator::Eq => Ok(""),
            FilterOperator::Ne => Ok("_ne"),
            FilterOperator::Lt => Ok("_lt"),
            FilterOperator::Gt => Ok("_gt"),
            FilterOperator::Lte => Ok("_lte"),
            FilterOperator::Gte => Ok("_gte"),
            FilterOperator::In => Ok("_in"),
            FilterOperator::Nin => Ok("_nin"),
            FilterOperator::Contains => Ok("_like"),
            FilterOperator::Ncontains => Ok("_nlike"),
            FilterOperator::Containss
            | FilterOperator::Ncontainss
            | FilterOperator::Null
            | FilterOperator::Nnull => Err(QueryError::UnsupportedOperator(*self)),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Lt => "lt",
            FilterOperator::Gt => "gt",
            FilterOperator::Lte => "lte",
            FilterOperator::Gte => "gte",
            FilterOperator::In => "in",
            FilterOperator::Nin => "nin",
            FilterOperator::Contains => "contains",
            FilterOperator::Ncontains => "ncontains",
            FilterOperator::Containss => "containss",
            FilterOperator::Ncontainss => "ncontainss",
            FilterOperator::Null => "null",
            FilterOperator::Nnull => "nnull",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(FilterOperator::Eq),
            "ne" => Ok(FilterOperator::Ne),
            "lt" => Ok(FilterOperator::Lt),
            "gt" => Ok(FilterOperator::Gt),
            "lte" => Ok(FilterOperator::Lte),
            "gte" => Ok(FilterOperator::Gte),
            "in" => Ok(FilterOperator::In),
            "nin" => Ok(FilterOperator::Nin),
            "contains" => Ok(FilterOperator::Contains),
            "ncontains" => Ok(FilterOperator::Ncontains),
            "containss" => Ok(FilterOperator::Containss),
            "ncontainss" => Ok(FilterOperator::Ncontainss),
            "null" => Ok(FilterOperator::Null),
            "nnull" => Ok(FilterOperator::Nnull),
            other => Err(QueryError::UnknownOperator(other.to_string())),
        }
    }
}

/// A (field, operator, value) triple restricting list results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Field the clause applies to.
    pub field: String,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Comparison value; arrays are expected for `In` / `Nin`.
    pub value: serde_json::Value,
}

impl FilterClause {
    /// Convenience constructor.
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query-pair building
// ---------------------------------------------------------------------------

/// Ordered query map with last-write-wins keys.
///
/// Two clauses serializing to the same `field + suffix` key overwrite rather
/// than duplicate; insertion order of first appearance is preserved. Array
/// values expand to one repeated pair per element at serialization time, so
/// overwriting happens at the key level before expansion.
#[derive(Debug, Clone, Default)]
pub struct QueryPairs {
    entries: Vec<(String, serde_json::Value)>,
}

impl QueryPairs {
    /// Insert a key, overwriting the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Append all entries of another map, overwriting on key collisions.
    pub fn extend(&mut self, other: QueryPairs) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// True when no entries have been inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into `(key, value)` string pairs ready for URL encoding.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.entries.len());
        for (key, value) in self.entries {
            match value {
                serde_json::Value::Array(items) => {
                    for item in items {
                        pairs.push((key.clone(), scalar_to_string(item)));
                    }
                }
                other => pairs.push((key, scalar_to_string(other))),
            }
        }
        pairs
    }
}

/// Render a scalar JSON value the way it appears in a query string.
fn scalar_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Translate filter clauses into `{field}{suffix}` pairs.
///
/// Later clauses overwrite earlier ones that serialize to the same key.
pub fn filter_pairs(filters: &[FilterClause]) -> Result<QueryPairs, QueryError> {
    let mut pairs = QueryPairs::default();
    for clause in filters {
        let suffix = clause.operator.suffix()?;
        pairs.insert(format!("{}{}", clause.field, suffix), clause.value.clone());
    }
    Ok(pairs)
}

/// `_sort` / `_order` pairs from the first sorter.
///
/// The backend understands a single sort column; when more than one sorter is
/// supplied, only the first is sent and the rest are dropped.
pub fn sort_pairs(sorters: &[Sorter]) -> QueryPairs {
    let mut pairs = QueryPairs::default();
    if let Some(sorter) = sorters.first() {
        pairs.insert("_sort", serde_json::Value::String(sorter.field.clone()));
        pairs.insert(
            "_order",
            serde_json::Value::String(sorter.order.to_string()),
        );
    }
    pairs
}

/// Full query for a list request: pagination window, sort, then filters.
pub fn list_pairs(
    pagination: &Pagination,
    sorters: &[Sorter],
    filters: &[FilterClause],
) -> Result<QueryPairs, QueryError> {
    pagination.validate()?;
    let mut pairs = QueryPairs::default();
    pairs.insert("_start", serde_json::Value::from(pagination.start()));
    pairs.insert("_end", serde_json::Value::from(pagination.end()));
    pairs.extend(sort_pairs(sorters));
    pairs.extend(filter_pairs(filters)?);
    Ok(pairs)
}
