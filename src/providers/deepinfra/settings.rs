//! DeepInfra settings.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::execution::http::transport::HttpTransport;
use crate::standards::openai_compatible::{
    OpenAiCompatibleChatSettings, OpenAiCompatibleCompletionSettings,
    OpenAiCompatibleEmbeddingSettings,
};
use crate::types::HttpConfig;

pub type DeepInfraChatSettings = OpenAiCompatibleChatSettings;
pub type DeepInfraCompletionSettings = OpenAiCompatibleCompletionSettings;
pub type DeepInfraEmbeddingSettings = OpenAiCompatibleEmbeddingSettings;

/// Provider-level settings passed to [`create_deepinfra`](super::create_deepinfra).
///
/// Every field is optional:
/// - `api_key` falls back to `DEEPINFRA_API_KEY`, read when a request is built
/// - `base_url` defaults to `https://api.deepinfra.com/v1`; one trailing `/` is dropped
/// - `headers` are sent with every request and win over computed ones
/// - `fetch` replaces the HTTP transport for all models
#[derive(Clone, Default)]
pub struct DeepInfraProviderSettings {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub headers: HashMap<String, String>,
    pub fetch: Option<Arc<dyn HttpTransport>>,
    /// Used to build a dedicated transport when `fetch` is not set.
    pub http_config: Option<HttpConfig>,
}

impl std::fmt::Debug for DeepInfraProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepInfraProviderSettings")
            .field("has_api_key", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("has_fetch", &self.fetch.is_some())
            .field("http_config", &self.http_config)
            .finish()
    }
}

impl DeepInfraProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add one custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn fetch(mut self, fetch: Arc<dyn HttpTransport>) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = Some(config);
        self
    }
}

/// Image model settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepInfraImageSettings {
    /// Images requested per HTTP call. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_images_per_call: Option<u32>,
}

impl DeepInfraImageSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_images_per_call(mut self, max: u32) -> Self {
        self.max_images_per_call = Some(max);
        self
    }

    pub(crate) fn resolved_max_images_per_call(&self) -> u32 {
        self.max_images_per_call
            .unwrap_or(defaults::deepinfra::MAX_IMAGES_PER_CALL)
            .max(1)
    }
}
