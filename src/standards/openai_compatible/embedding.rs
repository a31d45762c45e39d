//! OpenAI-compatible embedding model (`/embeddings`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::config::OpenAiCompatibleConfig;
use super::errors::openai_compatible_http_error;
use crate::defaults;
use crate::error::LlmError;
use crate::execution::http::request::post_json;
use crate::traits::EmbeddingCapability;
use crate::types::{
    EmbeddingRequest, EmbeddingResponse, EmbeddingUsage, HttpResponseInfo, Usage,
};

const EMBEDDINGS_PATH: &str = "/embeddings";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiCompatibleEmbeddingSettings {
    /// Output dimensionality, for models that support truncation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Defaults to 2048.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_embeddings_per_call: Option<usize>,
    /// Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_parallel_calls: Option<bool>,
}

impl OpenAiCompatibleEmbeddingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(mut self, dimensions: u32) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn max_embeddings_per_call(mut self, max: usize) -> Self {
        self.max_embeddings_per_call = Some(max);
        self
    }

    pub fn supports_parallel_calls(mut self, supported: bool) -> Self {
        self.supports_parallel_calls = Some(supported);
        self
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleEmbeddingModel {
    model_id: String,
    settings: OpenAiCompatibleEmbeddingSettings,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleEmbeddingModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: OpenAiCompatibleEmbeddingSettings,
        config: OpenAiCompatibleConfig,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    pub fn settings(&self) -> &OpenAiCompatibleEmbeddingSettings {
        &self.settings
    }

    pub fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    fn build_body(&self, request: &EmbeddingRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), json!(self.model_id));
        body.insert("input".into(), json!(request.input));
        body.insert("encoding_format".into(), json!("float"));
        if let Some(dimensions) = request.dimensions.or(self.settings.dimensions) {
            body.insert("dimensions".into(), json!(dimensions));
        }
        if let Some(user) = &self.settings.user {
            body.insert("user".into(), json!(user));
        }
        Value::Object(body)
    }
}

fn parse_embedding_response(json: &Value, model_id: &str) -> Result<EmbeddingResponse, LlmError> {
    let data = json
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::ParseError("No data in embedding response".to_string()))?;

    let mut indexed = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let index = item
            .get("index")
            .and_then(Value::as_u64)
            .map(|i| i as usize)
            .unwrap_or(position);
        let vector = item
            .get("embedding")
            .and_then(Value::as_array)
            .ok_or_else(|| LlmError::ParseError("Embedding item has no vector".to_string()))?
            .iter()
            .map(|v| {
                v.as_f64().map(|f| f as f32).ok_or_else(|| {
                    LlmError::ParseError("Embedding vector contains a non-number".to_string())
                })
            })
            .collect::<Result<Vec<f32>, _>>()?;
        indexed.push((index, vector));
    }
    indexed.sort_by_key(|(index, _)| *index);

    let usage = json.get("usage").and_then(|u| {
        let prompt_tokens =
            Usage::clamp_count(u.get("prompt_tokens").and_then(Value::as_u64)?);
        let total_tokens = u
            .get("total_tokens")
            .and_then(Value::as_u64)
            .map(Usage::clamp_count)
            .unwrap_or(prompt_tokens);
        Some(EmbeddingUsage {
            prompt_tokens,
            total_tokens,
        })
    });

    Ok(EmbeddingResponse {
        embeddings: indexed.into_iter().map(|(_, v)| v).collect(),
        model: json
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(model_id)
            .to_string(),
        usage,
        response: None,
    })
}

#[async_trait]
impl EmbeddingCapability for OpenAiCompatibleEmbeddingModel {
    async fn embed_request(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, LlmError> {
        let max = self.max_embeddings_per_call();
        if request.input.len() > max {
            return Err(LlmError::InvalidInput(format!(
                "Too many values for a single embedding call. {} model {} can only embed up to {max} values per call, but {} values were provided.",
                self.config.provider,
                self.model_id,
                request.input.len()
            )));
        }

        let body = self.build_body(&request);
        let headers = self.config.resolve_headers()?;
        let url = self.config.url_for(&self.model_id, EMBEDDINGS_PATH);
        let transport = self.config.transport();

        let response = post_json(
            transport.as_ref(),
            self.config.provider_name(),
            url,
            &headers,
            body,
            openai_compatible_http_error,
        )
        .await?;

        let mut parsed = parse_embedding_response(&response.body, &self.model_id)?;
        parsed.response = Some(HttpResponseInfo::new(&self.model_id, response.headers));
        Ok(parsed)
    }

    fn max_embeddings_per_call(&self) -> usize {
        self.settings
            .max_embeddings_per_call
            .unwrap_or(defaults::openai_compatible::MAX_EMBEDDINGS_PER_CALL)
    }

    fn supports_parallel_calls(&self) -> bool {
        self.settings.supports_parallel_calls.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::openai_compatible::UrlOptions;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn model(settings: OpenAiCompatibleEmbeddingSettings) -> OpenAiCompatibleEmbeddingModel {
        let config = OpenAiCompatibleConfig::new(
            "test.embedding",
            Arc::new(|opts: UrlOptions<'_>| format!("https://example.test{}", opts.path)),
            Arc::new(|| Ok(HashMap::new())),
        );
        OpenAiCompatibleEmbeddingModel::new("embed-model", settings, config)
    }

    #[test]
    fn body_prefers_request_dimensions() {
        let m = model(OpenAiCompatibleEmbeddingSettings::new().dimensions(256).user("u"));
        let body = m.build_body(&EmbeddingRequest::new(vec!["a".into()]));
        assert_eq!(body["dimensions"], 256);
        assert_eq!(body["encoding_format"], "float");
        assert_eq!(body["user"], "u");

        let body = m.build_body(&EmbeddingRequest::new(vec!["a".into()]).with_dimensions(64));
        assert_eq!(body["dimensions"], 64);
    }

    #[test]
    fn limits_default_and_override() {
        let m = model(OpenAiCompatibleEmbeddingSettings::new());
        assert_eq!(m.max_embeddings_per_call(), 2048);
        assert!(m.supports_parallel_calls());

        let m = model(
            OpenAiCompatibleEmbeddingSettings::new()
                .max_embeddings_per_call(2)
                .supports_parallel_calls(false),
        );
        assert_eq!(m.max_embeddings_per_call(), 2);
        assert!(!m.supports_parallel_calls());
    }

    #[tokio::test]
    async fn too_many_inputs_fail_before_sending() {
        let m = model(OpenAiCompatibleEmbeddingSettings::new().max_embeddings_per_call(1));
        let err = m
            .embed(vec!["a".into(), "b".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidInput(_)));
    }

    #[test]
    fn parse_orders_by_index() {
        let parsed = parse_embedding_response(
            &json!({
                "data": [
                    { "index": 1, "embedding": [0.5, 0.25] },
                    { "index": 0, "embedding": [1.0, 2.0] }
                ],
                "usage": { "prompt_tokens": 3, "total_tokens": 3 }
            }),
            "embed-model",
        )
        .unwrap();
        assert_eq!(parsed.embeddings, vec![vec![1.0, 2.0], vec![0.5, 0.25]]);
        assert_eq!(parsed.model, "embed-model");
        assert_eq!(parsed.usage.as_ref().unwrap().prompt_tokens, 3);
        assert_eq!(parsed.dimension(), 2);
    }

    #[test]
    fn oversized_usage_counts_saturate() {
        let parsed = parse_embedding_response(
            &json!({
                "data": [{ "index": 0, "embedding": [1.0] }],
                "usage": { "prompt_tokens": 4294967296u64 }
            }),
            "embed-model",
        )
        .unwrap();
        let usage = parsed.usage.unwrap();
        assert_eq!(usage.prompt_tokens, u32::MAX);
        assert_eq!(usage.total_tokens, u32::MAX);
    }
}
