//! Generic REST data provider.
//!
//! Translates resource-oriented CRUD calls into requests against
//! `<api_url>/<resource>` routes: GET for reads, POST for creates, PATCH for
//! partial updates, DELETE for removals, with `/bulk` sub-resources for the
//! batched variants. Query translation lives in
//! [`pressroom_core::query`]; this module owns the route and body shapes.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;

use pressroom_core::provider::{CustomRequest, DataProvider, HttpMethod};
use pressroom_core::query::{self, FilterClause, Pagination, QueryPairs, Sorter};
use pressroom_core::types::{ListResult, Record};

use crate::error::ClientError;
use crate::transport::{to_method, HttpTransport, RequestSpec};

/// Response header carrying the total record count across all pages.
const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// REST implementation of the generic data provider.
pub struct RestDataProvider {
    transport: Arc<HttpTransport>,
}

impl RestDataProvider {
    /// Wire the provider to a shared transport.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Collection URL of a resource.
    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{resource}", self.transport.api_url())
    }

    /// Record URL of a resource member.
    fn record_url(&self, resource: &str, id: &str) -> String {
        format!("{}/{resource}/{id}", self.transport.api_url())
    }

    /// Bulk sub-resource URL.
    fn bulk_url(&self, resource: &str) -> String {
        format!("{}/{resource}/bulk", self.transport.api_url())
    }

    /// Send a spec and decode the JSON body.
    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        spec: RequestSpec,
    ) -> Result<T, ClientError> {
        let response = self.transport.send(&spec).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Total record count from the list response headers.
///
/// The fixed backend omits the header on some responses; that reads as an
/// empty collection (`0`). A header that is present but not a number is a
/// hard error.
fn total_from_headers(headers: &HeaderMap) -> Result<u64, ClientError> {
    let Some(value) = headers.get(TOTAL_COUNT_HEADER) else {
        tracing::debug!("Response carries no {TOTAL_COUNT_HEADER} header, reporting total 0");
        return Ok(0);
    };

    let raw = value.to_str().map_err(|_| ClientError::TotalCount {
        raw: format!("{value:?}"),
    })?;
    raw.trim().parse::<u64>().map_err(|_| ClientError::TotalCount {
        raw: raw.to_string(),
    })
}

#[async_trait]
impl DataProvider for RestDataProvider {
    type Error = ClientError;

    async fn list(
        &self,
        resource: &str,
        pagination: &Pagination,
        sorters: &[Sorter],
        filters: &[FilterClause],
    ) -> Result<ListResult, Self::Error> {
        let pairs = query::list_pairs(pagination, sorters, filters)?;
        if sorters.len() > 1 {
            tracing::debug!(
                dropped = sorters.len() - 1,
                "Backend sorts on a single column; extra sorters dropped"
            );
        }

        let mut spec = RequestSpec::new(Method::GET, self.resource_url(resource));
        spec.query = pairs.into_pairs();

        let response = self.transport.send(&spec).await?;
        let total = total_from_headers(response.headers())?;
        let data: Vec<Record> = response.json().await?;
        Ok(ListResult { data, total })
    }

    async fn get_one(&self, resource: &str, id: &str) -> Result<Record, Self::Error> {
        self.send_json(RequestSpec::new(Method::GET, self.record_url(resource, id)))
            .await
    }

    async fn get_many(&self, resource: &str, ids: &[String]) -> Result<Vec<Record>, Self::Error> {
        let mut spec = RequestSpec::new(Method::GET, self.resource_url(resource));
        spec.query = ids.iter().map(|id| ("id".to_string(), id.clone())).collect();
        self.send_json(spec).await
    }

    async fn create(&self, resource: &str, payload: Record) -> Result<Record, Self::Error> {
        let mut spec = RequestSpec::new(Method::POST, self.resource_url(resource));
        spec.body = Some(payload);
        self.send_json(spec).await
    }

    async fn update(
        &self,
        resource: &str,
        id: &str,
        payload: Record,
    ) -> Result<Record, Self::Error> {
        let mut spec = RequestSpec::new(Method::PATCH, self.record_url(resource, id));
        spec.body = Some(payload);
        self.send_json(spec).await
    }

    async fn delete_one(
        &self,
        resource: &str,
        id: &str,
        payload: Option<Record>,
    ) -> Result<Record, Self::Error> {
        let mut spec = RequestSpec::new(Method::DELETE, self.record_url(resource, id));
        spec.body = payload;
        self.send_json(spec).await
    }

    // The three bulk operations mirror the target API's conventions
    // verbatim: a values wrapper, an ids+variables body, and a CSV query
    // parameter. Wire compatibility wins over uniformity here.

    async fn create_many(
        &self,
        resource: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, Self::Error> {
        let mut spec = RequestSpec::new(Method::POST, self.bulk_url(resource));
        spec.body = Some(serde_json::json!({ "values": records }));
        self.send_json(spec).await
    }

    async fn update_many(
        &self,
        resource: &str,
        ids: &[String],
        variables: Record,
    ) -> Result<Vec<Record>, Self::Error> {
        let mut spec = RequestSpec::new(Method::PATCH, self.bulk_url(resource));
        spec.body = Some(serde_json::json!({ "ids": ids, "variables": variables }));
        self.send_json(spec).await
    }

    async fn delete_many(
        &self,
        resource: &str,
        ids: &[String],
    ) -> Result<Vec<Record>, Self::Error> {
        let mut spec = RequestSpec::new(Method::DELETE, self.bulk_url(resource));
        spec.query = vec![("ids".to_string(), ids.join(","))];
        self.send_json(spec).await
    }

    async fn custom(&self, request: CustomRequest) -> Result<Record, Self::Error> {
        let mut pairs = QueryPairs::default();
        pairs.extend(query::sort_pairs(&request.sorters));
        pairs.extend(query::filter_pairs(&request.filters)?);
        for (key, value) in request.query {
            pairs.insert(key, value);
        }

        let mut spec = RequestSpec::new(to_method(request.method), request.url);
        spec.query = pairs.into_pairs();
        spec.headers = request.headers;
        // GET carries no body; every other method forwards the payload.
        if request.method != HttpMethod::Get {
            spec.body = request.payload;
        }

        self.send_json(spec).await
    }

    fn api_url(&self) -> &str {
        self.transport.api_url()
    }
}
