//! HTTP transport abstraction.
//!
//! A transport is the Rust form of a provider's custom `fetch`: it receives the
//! final URL, headers and JSON body and returns the raw response. Models use the
//! transport from their config when present and the process-wide default
//! otherwise.

use crate::error::LlmError;
use crate::types::HttpConfig;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use tokio::sync::OnceCell;

/// Raw response body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, LlmError>> + Send>>;

/// Transport-level request data for JSON POST requests.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Transport-level streaming response.
pub struct HttpTransportStreamResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl std::fmt::Debug for HttpTransportStreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportStreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Custom HTTP transport for JSON requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute_json(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, LlmError>;

    /// Streaming variant used for SSE responses.
    async fn execute_stream(
        &self,
        _request: HttpTransportRequest,
    ) -> Result<HttpTransportStreamResponse, LlmError> {
        Err(LlmError::UnsupportedOperation(
            "this transport does not support streaming".to_string(),
        ))
    }
}

/// `reqwest`-backed transport.
///
/// The client is built on first use, so an invalid proxy surfaces as an error
/// from the first request rather than from provider construction.
#[derive(Debug)]
pub struct ReqwestTransport {
    config: HttpConfig,
    client: OnceCell<reqwest::Client>,
}

impl ReqwestTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Use a preconfigured client. `HttpConfig` is not applied to it.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            config: HttpConfig::default(),
            client: OnceCell::new_with(Some(client)),
        }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    async fn client(&self) -> Result<&reqwest::Client, LlmError> {
        self.client
            .get_or_try_init(|| async { build_http_client(&self.config) })
            .await
    }

    async fn send(&self, request: HttpTransportRequest) -> Result<reqwest::Response, LlmError> {
        let client = self.client().await?;
        let response = client
            .post(&request.url)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await?;
        Ok(response)
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(HttpConfig::default())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute_json(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, LlmError> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportStreamResponse, LlmError> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(LlmError::from));
        Ok(HttpTransportStreamResponse {
            status,
            headers,
            body: Box::pin(body),
        })
    }
}

/// Build a `reqwest::Client` from `HttpConfig`.
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    if let Some(proxy) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid proxy '{proxy}': {e}")))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| LlmError::ConfigurationError(format!("Failed to build HTTP client: {e}")))
}

/// Process-wide transport used when a model has no `fetch` override.
pub fn default_transport() -> Arc<dyn HttpTransport> {
    static DEFAULT: OnceLock<Arc<ReqwestTransport>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| Arc::new(ReqwestTransport::default()))
        .clone()
}
