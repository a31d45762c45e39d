//! Image generation types.

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::common::Warning;
use super::http::HttpResponseInfo;
use crate::error::LlmError;

/// Image generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    /// Number of images to generate.
    pub count: u32,
    /// `"{width}x{height}"`, e.g. `"1024x768"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// e.g. `"16:9"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Extra body fields merged verbatim into the request.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub provider_options: serde_json::Map<String, serde_json::Value>,
}

impl Default for ImageGenerationRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            count: 1,
            size: None,
            aspect_ratio: None,
            seed: None,
            provider_options: serde_json::Map::new(),
        }
    }
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(aspect_ratio.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_provider_option(
        mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.provider_options.insert(key.into(), value);
        self
    }
}

/// A generated image as base64 (no data-URL prefix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub b64_json: String,
}

impl GeneratedImage {
    /// Decode the image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>, LlmError> {
        base64::engine::general_purpose::STANDARD
            .decode(self.b64_json.as_bytes())
            .map_err(|e| LlmError::ParseError(format!("Invalid base64 image payload: {e}")))
    }
}

/// Image generation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    pub images: Vec<GeneratedImage>,
    pub warnings: Vec<Warning>,
    /// One entry per HTTP call made.
    #[serde(skip)]
    pub responses: Vec<HttpResponseInfo>,
}
