//! HTTP transport

use async_trait::async_trait;
use formdesk_common::{ErrorBody, FieldSchema, FormdeskError, FormdeskResult, Payload, Record};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::debug;

use crate::transport::CollectionTransport;

/// JSON-over-HTTP transport for one collection.
///
/// ```text
/// GET    {base}/schema/{collection}
/// GET    {base}/{collection}
/// GET    {base}/{collection}/search?q=
/// POST   {base}/{collection}
/// PUT    {base}/{collection}/{id}
/// DELETE {base}/{collection}/{id}
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    collection: String,
    schema_path: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport for `collection` under `base_url`
    pub fn new(base_url: &str, collection: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.trim_matches('/').to_string(),
            schema_path: format!("/schema/{}", collection.trim_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    /// Override where the schema is fetched from
    pub fn with_schema_path(mut self, path: &str) -> Self {
        self.schema_path = format!("/{}", path.trim_start_matches('/'));
        self
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, self.collection, suffix)
    }

    /// URL of one record; `id` is one percent-encoded path segment
    fn record_url(&self, id: &str) -> FormdeskResult<Url> {
        let invalid = || FormdeskError::Transport(format!("invalid base url: {}", self.base_url));
        let mut url = Url::parse(&self.collection_url("")).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(id);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, id: Option<&str>) -> FormdeskResult<T> {
        let resp = req
            .send()
            .await
            .map_err(|e| FormdeskError::Transport(format!("network error: {e}")))?;
        let status = resp.status();
        debug!(%status, url = %resp.url(), "response");

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(FormdeskError::NotFound(id.to_string()));
            }
        }
        if !status.is_success() {
            let reason = resp
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(FormdeskError::Transport(format!("HTTP {status}: {reason}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| FormdeskError::Transport(format!("failed to parse response: {e}")))
    }
}

#[async_trait]
impl CollectionTransport for HttpTransport {
    async fn fetch_schema(&self) -> FormdeskResult<Vec<FieldSchema>> {
        let url = format!("{}{}", self.base_url, self.schema_path);
        self.send(self.client.get(url), None).await
    }

    async fn list(&self) -> FormdeskResult<Vec<Record>> {
        self.send(self.client.get(self.collection_url("")), None).await
    }

    async fn search(&self, term: &str) -> FormdeskResult<Vec<Record>> {
        let req = self
            .client
            .get(self.collection_url("/search"))
            .query(&[("q", term)]);
        self.send(req, None).await
    }

    async fn create(&self, payload: &Payload) -> FormdeskResult<Record> {
        let req = self.client.post(self.collection_url("")).json(payload);
        self.send(req, None).await
    }

    async fn update(&self, id: &str, payload: &Payload) -> FormdeskResult<Record> {
        let req = self
            .client
            .put(self.record_url(id)?)
            .json(payload);
        self.send(req, Some(id)).await
    }

    async fn delete(&self, id: &str) -> FormdeskResult<()> {
        let req = self.client.delete(self.record_url(id)?);
        self.send::<IgnoredAny>(req, Some(id)).await.map(|_| ())
    }
}
