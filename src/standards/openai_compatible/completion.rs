//! OpenAI-compatible text completion model (`/completions`).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::chat::parse_usage;
use super::config::OpenAiCompatibleConfig;
use super::errors::openai_compatible_http_error;
use crate::error::LlmError;
use crate::execution::http::request::post_json;
use crate::traits::CompletionCapability;
use crate::types::{CompletionRequest, CompletionResponse, FinishReason, HttpResponseInfo};

const COMPLETIONS_PATH: &str = "/completions";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenAiCompatibleCompletionSettings {
    /// Echo the prompt back in addition to the completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echo: Option<bool>,
    /// Token id to bias (-100..=100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<HashMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl OpenAiCompatibleCompletionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = Some(echo);
        self
    }

    pub fn logit_bias(mut self, token: impl Into<String>, bias: f64) -> Self {
        self.logit_bias
            .get_or_insert_with(HashMap::new)
            .insert(token.into(), bias);
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// Completion model speaking the OpenAI legacy completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleCompletionLanguageModel {
    model_id: String,
    settings: OpenAiCompatibleCompletionSettings,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleCompletionLanguageModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: OpenAiCompatibleCompletionSettings,
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

    pub fn settings(&self) -> &OpenAiCompatibleCompletionSettings {
        &self.settings
    }

    pub fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    fn build_body(&self, request: &CompletionRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), json!(self.model_id));
        body.insert("prompt".into(), json!(request.prompt));

        let settings = &self.settings;
        if let Some(echo) = settings.echo {
            body.insert("echo".into(), json!(echo));
        }
        if let Some(bias) = &settings.logit_bias {
            body.insert("logit_bias".into(), json!(bias));
        }
        if let Some(suffix) = &settings.suffix {
            body.insert("suffix".into(), json!(suffix));
        }
        if let Some(user) = &settings.user {
            body.insert("user".into(), json!(user));
        }

        if let Some(v) = request.max_tokens {
            body.insert("max_tokens".into(), json!(v));
        }
        if let Some(v) = request.temperature {
            body.insert("temperature".into(), json!(v));
        }
        if let Some(v) = request.top_p {
            body.insert("top_p".into(), json!(v));
        }
        if let Some(v) = request.frequency_penalty {
            body.insert("frequency_penalty".into(), json!(v));
        }
        if let Some(v) = request.presence_penalty {
            body.insert("presence_penalty".into(), json!(v));
        }
        if let Some(v) = &request.stop {
            body.insert("stop".into(), json!(v));
        }
        if let Some(v) = request.seed {
            body.insert("seed".into(), json!(v));
        }

        Value::Object(body)
    }
}

fn parse_completion_response(json: &Value) -> Result<CompletionResponse, LlmError> {
    let choice = json
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| LlmError::ParseError("No choices in completion response".to_string()))?;

    Ok(CompletionResponse {
        id: json.get("id").and_then(Value::as_str).map(str::to_string),
        model: json.get("model").and_then(Value::as_str).map(str::to_string),
        text: choice
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        finish_reason: FinishReason::from_openai(
            choice.get("finish_reason").and_then(Value::as_str),
        ),
        usage: parse_usage(json.get("usage")),
        warnings: Vec::new(),
        response: None,
    })
}

#[async_trait]
impl CompletionCapability for OpenAiCompatibleCompletionLanguageModel {
    async fn complete_request(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let body = self.build_body(&request);
        let headers = self.config.resolve_headers()?;
        let url = self.config.url_for(&self.model_id, COMPLETIONS_PATH);
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

        let mut parsed = parse_completion_response(&response.body)?;
        parsed.response = Some(HttpResponseInfo::new(&self.model_id, response.headers));
        Ok(parsed)
    }
}
