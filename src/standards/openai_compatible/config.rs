//! Model configuration record.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LlmError;
use crate::execution::http::transport::{HttpTransport, default_transport};
use crate::types::ObjectGenerationMode;

/// Input to a [`UrlResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlOptions<'a> {
    pub model_id: &'a str,
    /// Endpoint path such as `/chat/completions`.
    pub path: &'a str,
}

/// Maps an endpoint path to a full URL.
pub type UrlResolver = Arc<dyn Fn(UrlOptions<'_>) -> String + Send + Sync>;

/// Produces the request headers. Evaluated once per request.
pub type HeadersResolver = Arc<dyn Fn() -> Result<HashMap<String, String>, LlmError> + Send + Sync>;

/// Configuration shared by the OpenAI-compatible models.
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Provider tag, e.g. `deepinfra.chat`.
    pub provider: String,
    pub url: UrlResolver,
    pub headers: HeadersResolver,
    /// Transport override; `None` uses the process-wide default.
    pub fetch: Option<Arc<dyn HttpTransport>>,
    /// How the chat model produces structured objects when asked for JSON.
    pub default_object_generation_mode: Option<ObjectGenerationMode>,
}

impl std::fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("provider", &self.provider)
            .field("has_fetch", &self.fetch.is_some())
            .field(
                "default_object_generation_mode",
                &self.default_object_generation_mode,
            )
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleConfig {
    pub fn new(provider: impl Into<String>, url: UrlResolver, headers: HeadersResolver) -> Self {
        Self {
            provider: provider.into(),
            url,
            headers,
            fetch: None,
            default_object_generation_mode: None,
        }
    }

    pub fn with_fetch(mut self, fetch: Option<Arc<dyn HttpTransport>>) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_default_object_generation_mode(mut self, mode: ObjectGenerationMode) -> Self {
        self.default_object_generation_mode = Some(mode);
        self
    }

    /// Provider name without the model-kind suffix (`deepinfra.chat` -> `deepinfra`).
    pub fn provider_name(&self) -> &str {
        self.provider
            .split_once('.')
            .map(|(name, _)| name)
            .unwrap_or(&self.provider)
    }

    pub fn url_for(&self, model_id: &str, path: &str) -> String {
        (self.url)(UrlOptions { model_id, path })
    }

    pub fn resolve_headers(&self) -> Result<HashMap<String, String>, LlmError> {
        (self.headers)()
    }

    pub(crate) fn transport(&self) -> Arc<dyn HttpTransport> {
        self.fetch.clone().unwrap_or_else(default_transport)
    }
}
