//! OpenAI-compatible chat language model (`/chat/completions`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::config::OpenAiCompatibleConfig;
use super::errors::openai_compatible_http_error;
use super::stream::{chat_event_stream, simulated_chat_stream};
use crate::error::LlmError;
use crate::execution::http::request::{post_json, post_stream};
use crate::streaming::ChatStream;
use crate::traits::ChatCapability;
use crate::types::{
    ChatMessage, ChatRequest, ChatResponse, FinishReason, HttpResponseInfo, MessageRole,
    ObjectGenerationMode, ResponseFormat, ToolCall, ToolChoice, Usage, Warning,
};

const CHAT_PATH: &str = "/chat/completions";

/// Per-model chat settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiCompatibleChatSettings {
    /// End-user identifier forwarded as `user`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Serve stream requests with one non-streaming call replayed as events.
    #[serde(default)]
    pub simulate_streaming: bool,
}

impl OpenAiCompatibleChatSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn simulate_streaming(mut self, enabled: bool) -> Self {
        self.simulate_streaming = enabled;
        self
    }
}

/// Chat model speaking the OpenAI chat-completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleChatLanguageModel {
    model_id: String,
    settings: OpenAiCompatibleChatSettings,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleChatLanguageModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: OpenAiCompatibleChatSettings,
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

    /// Provider tag, e.g. `deepinfra.chat`.
    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    pub fn settings(&self) -> &OpenAiCompatibleChatSettings {
        &self.settings
    }

    pub fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    pub fn default_object_generation_mode(&self) -> Option<ObjectGenerationMode> {
        self.config.default_object_generation_mode
    }

    fn build_body(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<(Value, Vec<Warning>), LlmError> {
        let mut warnings = Vec::new();
        let mut body = Map::new();
        body.insert("model".into(), json!(self.model_id));
        body.insert(
            "messages".into(),
            Value::Array(request.messages.iter().map(message_to_json).collect()),
        );

        if let Some(user) = &self.settings.user {
            body.insert("user".into(), json!(user));
        }
        insert_opt(&mut body, "temperature", request.temperature);
        insert_opt(&mut body, "max_tokens", request.max_tokens);
        insert_opt(&mut body, "top_p", request.top_p);
        insert_opt(&mut body, "frequency_penalty", request.frequency_penalty);
        insert_opt(&mut body, "presence_penalty", request.presence_penalty);
        insert_opt(&mut body, "stop", request.stop.clone());
        insert_opt(&mut body, "seed", request.seed);

        if let Some(tools) = request.tools.as_ref().filter(|t| !t.is_empty()) {
            let tools: Vec<Value> = tools
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": tool.name,
                            "description": tool.description,
                            "parameters": tool.parameters,
                        }
                    })
                })
                .collect();
            body.insert("tools".into(), Value::Array(tools));
            if let Some(choice) = &request.tool_choice {
                body.insert("tool_choice".into(), tool_choice_to_json(choice));
            }
        }

        match &request.response_format {
            None | Some(ResponseFormat::Text) => {}
            Some(ResponseFormat::Json { schema, .. }) => {
                if self.default_object_generation_mode() != Some(ObjectGenerationMode::Json) {
                    return Err(LlmError::UnsupportedOperation(format!(
                        "{} does not support JSON response format",
                        self.config.provider
                    )));
                }
                if schema.is_some() {
                    warnings.push(Warning::unsupported_setting(
                        "response_format",
                        Some("JSON schema is not forwarded; only JSON object mode is requested"),
                    ));
                }
                body.insert("response_format".into(), json!({ "type": "json_object" }));
            }
        }

        if stream {
            body.insert("stream".into(), json!(true));
            body.insert("stream_options".into(), json!({ "include_usage": true }));
        }

        Ok((Value::Object(body), warnings))
    }

    async fn do_generate(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let (body, warnings) = self.build_body(&request, false)?;
        let headers = self.config.resolve_headers()?;
        let url = self.config.url_for(&self.model_id, CHAT_PATH);
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

        let mut parsed = parse_chat_response(&response.body)?;
        parsed.warnings = warnings;
        parsed.response = Some(HttpResponseInfo::new(&self.model_id, response.headers));
        Ok(parsed)
    }
}

#[async_trait]
impl ChatCapability for OpenAiCompatibleChatLanguageModel {
    async fn chat_request(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        self.do_generate(request).await
    }

    async fn chat_stream_request(&self, request: ChatRequest) -> Result<ChatStream, LlmError> {
        if self.settings.simulate_streaming {
            let response = self.do_generate(request).await?;
            return Ok(simulated_chat_stream(response, self.config.provider.clone()));
        }

        let (body, warnings) = self.build_body(&request, true)?;
        let headers = self.config.resolve_headers()?;
        let url = self.config.url_for(&self.model_id, CHAT_PATH);
        let transport = self.config.transport();

        let response = post_stream(
            transport.as_ref(),
            self.config.provider_name(),
            url,
            &headers,
            body,
            openai_compatible_http_error,
        )
        .await?;

        Ok(chat_event_stream(
            response.body,
            self.config.provider.clone(),
            self.model_id.clone(),
            warnings,
            response.headers,
        ))
    }
}

fn insert_opt<T: Serialize>(body: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        body.insert(key.to_string(), json!(value));
    }
}

fn message_to_json(message: &ChatMessage) -> Value {
    match message.role {
        MessageRole::Tool => json!({
            "role": "tool",
            "tool_call_id": message.tool_call_id,
            "content": message.content.as_deref().unwrap_or_default(),
        }),
        MessageRole::Assistant if !message.tool_calls.is_empty() => {
            let tool_calls: Vec<Value> = message
                .tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": { "name": call.name, "arguments": call.arguments },
                    })
                })
                .collect();
            json!({
                "role": "assistant",
                "content": message.content,
                "tool_calls": tool_calls,
            })
        }
        role => json!({
            "role": role,
            "content": message.content.as_deref().unwrap_or_default(),
        }),
    }
}

fn tool_choice_to_json(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::None => json!("none"),
        ToolChoice::Required => json!("required"),
        ToolChoice::Tool(name) => json!({ "type": "function", "function": { "name": name } }),
    }
}

/// Parse an OpenAI `usage` object.
pub(super) fn parse_usage(value: Option<&Value>) -> Option<Usage> {
    let usage = value?.as_object()?;
    let read = |key: &str| usage.get(key).and_then(Value::as_u64).map(Usage::clamp_count);
    let prompt = read("prompt_tokens").unwrap_or(0);
    let completion = read("completion_tokens").unwrap_or(0);
    Some(Usage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: read("total_tokens").unwrap_or(prompt.saturating_add(completion)),
    })
}

pub(super) fn parse_tool_calls(value: Option<&Value>) -> Vec<ToolCall> {
    value
        .and_then(Value::as_array)
        .map(|calls| {
            calls
                .iter()
                .enumerate()
                .filter_map(|(i, call)| {
                    let function = call.get("function")?;
                    Some(ToolCall {
                        id: call
                            .get("id")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("call_{i}")),
                        name: function.get("name")?.as_str()?.to_string(),
                        arguments: function
                            .get("arguments")
                            .and_then(Value::as_str)
                            .unwrap_or("{}")
                            .to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(super) fn parse_chat_response(json: &Value) -> Result<ChatResponse, LlmError> {
    let choice = json
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| LlmError::ParseError("No choices in chat response".to_string()))?;
    let message = choice
        .get("message")
        .ok_or_else(|| LlmError::ParseError("Chat choice has no message".to_string()))?;

    Ok(ChatResponse {
        id: non_empty_str(json.get("id")),
        model: non_empty_str(json.get("model")),
        content: non_empty_str(message.get("content")),
        reasoning: non_empty_str(message.get("reasoning_content")),
        tool_calls: parse_tool_calls(message.get("tool_calls")),
        finish_reason: FinishReason::from_openai(
            choice.get("finish_reason").and_then(Value::as_str),
        ),
        usage: parse_usage(json.get("usage")),
        warnings: Vec::new(),
        response: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::openai_compatible::config::UrlOptions;
    use crate::types::Tool;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn model(mode: Option<ObjectGenerationMode>) -> OpenAiCompatibleChatLanguageModel {
        let mut config = OpenAiCompatibleConfig::new(
            "test.chat",
            Arc::new(|opts: UrlOptions<'_>| format!("https://example.test{}", opts.path)),
            Arc::new(|| Ok(HashMap::new())),
        );
        config.default_object_generation_mode = mode;
        OpenAiCompatibleChatLanguageModel::new(
            "some/model",
            OpenAiCompatibleChatSettings::new().user("user-1"),
            config,
        )
    }

    #[test]
    fn body_contains_model_messages_and_settings() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
        ])
        .with_temperature(0.5)
        .with_max_tokens(64);

        let (body, warnings) = model(None).build_body(&request, false).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(body["model"], "some/model");
        assert_eq!(body["user"], "user-1");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn stream_body_requests_usage() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")]);
        let (body, _) = model(None).build_body(&request, true).unwrap();
        assert_eq!(body["stream"], true);
        assert_eq!(body["stream_options"]["include_usage"], true);
    }

    #[test]
    fn tools_and_tool_messages_serialize_in_openai_shape() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "weather".into(),
            arguments: r#"{"city":"Paris"}"#.into(),
        };
        let request = ChatRequest::new(vec![
            ChatMessage::user("weather?"),
            ChatMessage::assistant_tool_calls(vec![call]),
            ChatMessage::tool("call_1", "sunny"),
        ])
        .with_tools(vec![Tool::function(
            "weather",
            "Get weather",
            json!({"type": "object"}),
        )])
        .with_tool_choice(ToolChoice::Tool("weather".into()));

        let (body, _) = model(None).build_body(&request, false).unwrap();
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "weather");
        assert_eq!(body["tool_choice"]["function"]["name"], "weather");
        assert_eq!(body["messages"][1]["tool_calls"][0]["id"], "call_1");
        assert!(body["messages"][1]["content"].is_null());
        assert_eq!(body["messages"][2]["role"], "tool");
        assert_eq!(body["messages"][2]["tool_call_id"], "call_1");
    }

    #[test]
    fn tool_choice_without_tools_is_dropped() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_tool_choice(ToolChoice::Required);
        let (body, _) = model(None).build_body(&request, false).unwrap();
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn json_response_format_requires_json_mode() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")]).with_response_format(
            ResponseFormat::Json {
                schema: Some(json!({"type": "object"})),
                name: None,
            },
        );

        let err = model(None).build_body(&request, false).unwrap_err();
        assert!(matches!(err, LlmError::UnsupportedOperation(_)));

        let (body, warnings) = model(Some(ObjectGenerationMode::Json))
            .build_body(&request, false)
            .unwrap();
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn parses_content_reasoning_tool_calls_and_usage() {
        let raw = json!({
            "id": "chatcmpl-1",
            "model": "deepseek-ai/DeepSeek-R1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Answer",
                    "reasoning_content": "Thinking",
                    "tool_calls": [{
                        "id": "call_a",
                        "type": "function",
                        "function": {"name": "lookup", "arguments": "{\"q\":1}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 3, "completion_tokens": 4}
        });

        let response = parse_chat_response(&raw).unwrap();
        assert_eq!(response.content_text(), Some("Answer"));
        assert_eq!(response.reasoning.as_deref(), Some("Thinking"));
        assert_eq!(response.tool_calls[0].name, "lookup");
        assert_eq!(response.finish_reason, FinishReason::ToolCalls);
        assert_eq!(response.usage, Some(Usage::new(3, 4)));
    }

    #[test]
    fn missing_choices_is_a_parse_error() {
        let err = parse_chat_response(&json!({"id": "x", "choices": []})).unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[test]
    fn usage_counts_saturate_instead_of_overflowing() {
        let usage = parse_usage(Some(&json!({
            "prompt_tokens": 4294967295u64,
            "completion_tokens": 5
        })))
        .unwrap();
        assert_eq!(usage.prompt_tokens, u32::MAX);
        assert_eq!(usage.completion_tokens, 5);
        assert_eq!(usage.total_tokens, u32::MAX);

        let usage = parse_usage(Some(&json!({ "prompt_tokens": 4294967296u64 }))).unwrap();
        assert_eq!(usage.prompt_tokens, u32::MAX);
        assert_eq!(usage.total_tokens, u32::MAX);
    }
}
