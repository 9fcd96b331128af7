//! Client API calls for search endpoints.

use std::time::Instant;

use common::{
    search_query::SearchQueryOptions,
    search_result::{
        DocAddress, KeyHintsResponse, MoreLikeThisArticleInfo, MoreLikeThisResponse, ResponseEnvelope,
        RetrievedInfoResponse, SearchedArticleInfo, TopArticleInfo, TopInfoResponse,
    },
    text_highlight::Snippet,
};
use serde_json::Value;

use super::ApiError;
use crate::config::ClientConfig;

/// The network collaborator of the search engine.
///
/// Every call is a single GET that either yields the decoded items or an
/// [`ApiError`]. Futures are not required to be `Send`: the engine runs on a
/// single-threaded runtime.
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    async fn key_hints(&self, key: &str) -> Result<Vec<Snippet>, ApiError>;

    async fn retrieved_info(
        &self,
        key: &str,
        options: SearchQueryOptions,
        offset: u64,
        page_size: u64,
    ) -> Result<Vec<SearchedArticleInfo>, ApiError>;

    async fn top_info(&self) -> Result<Vec<TopArticleInfo>, ApiError>;

    async fn more_like_this(
        &self,
        address: DocAddress,
        offset: u64,
        page_size: u64,
    ) -> Result<Vec<MoreLikeThisArticleInfo>, ApiError>;
}

/// [`SearchBackend`] over HTTP, against `{base_url}/api/...`.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpSearchBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Client against `config.api_url` whose requests give up after
    /// `config.request_timeout`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(http_client, config.api_url.clone()))
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http_client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<E: ResponseEnvelope>(
        &self,
        endpoint: &'static str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<E::Item>, ApiError> {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        let t0 = Instant::now();
        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Network { endpoint, source })?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(endpoint, status = status.as_u16(), "search backend returned an error status");
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(endpoint, status.as_u16(), body));
        }
        let body = response.text().await.map_err(|source| ApiError::Network { endpoint, source })?;

        let envelope = parse_envelope::<E>(endpoint, &body)?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;
        match envelope.duration_ms() {
            Some(duration_ms) => tracing::info!(endpoint, duration_ms, elapsed_ms, "fetched"),
            None => tracing::info!(endpoint, elapsed_ms, "fetched"),
        }
        Ok(envelope.into_items())
    }
}

impl SearchBackend for HttpSearchBackend {
    async fn key_hints(&self, key: &str) -> Result<Vec<Snippet>, ApiError> {
        self.get::<KeyHintsResponse>("key_hints", &[("key", key.to_string())]).await
    }

    async fn retrieved_info(
        &self,
        key: &str,
        options: SearchQueryOptions,
        offset: u64,
        page_size: u64,
    ) -> Result<Vec<SearchedArticleInfo>, ApiError> {
        let mut query = vec![
            ("key", key.to_string()),
            ("offset", offset.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        query.extend(options.query_pairs());
        self.get::<RetrievedInfoResponse>("retrieved_info", &query).await
    }

    async fn top_info(&self) -> Result<Vec<TopArticleInfo>, ApiError> {
        self.get::<TopInfoResponse>("top_info", &[]).await
    }

    async fn more_like_this(
        &self,
        address: DocAddress,
        offset: u64,
        page_size: u64,
    ) -> Result<Vec<MoreLikeThisArticleInfo>, ApiError> {
        let mut query = vec![("offset", offset.to_string()), ("pageSize", page_size.to_string())];
        query.extend(address.query_pairs());
        self.get::<MoreLikeThisResponse>("more_like_this", &query).await
    }
}

/// Decodes a 200 body. Anything but a JSON object carrying
/// `E::ITEMS_KEY` is a [`ApiError::MalformedResponse`].
pub fn parse_envelope<E: ResponseEnvelope>(endpoint: &'static str, body: &str) -> Result<E, ApiError> {
    let malformed = |detail: String| ApiError::MalformedResponse { endpoint, expected_key: E::ITEMS_KEY, detail };

    let value: Value = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
    match &value {
        Value::Object(object) if object.contains_key(E::ITEMS_KEY) => {}
        Value::Object(_) => return Err(malformed(format!("missing key `{}`", E::ITEMS_KEY))),
        _ => return Err(malformed("not a JSON object".to_string())),
    }
    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}
