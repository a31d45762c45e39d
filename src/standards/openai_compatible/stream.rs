//! SSE chat stream decoding.

use std::collections::{BTreeMap, HashMap};

use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde_json::Value;

use super::chat::parse_usage;
use crate::error::LlmError;
use crate::execution::http::transport::ByteStream;
use crate::streaming::{ChatStream, ChatStreamEvent};
use crate::types::{
    ChatResponse, FinishReason, HttpResponseInfo, ResponseMetadata, ToolCall, Usage, Warning,
};

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Accumulates chunk deltas into the final response.
#[derive(Debug)]
struct ChatStreamState {
    provider: String,
    model_id: String,
    id: Option<String>,
    model: Option<String>,
    content: String,
    reasoning: String,
    tool_calls: BTreeMap<usize, PartialToolCall>,
    finish_reason: FinishReason,
    usage: Option<Usage>,
    warnings: Vec<Warning>,
    response: Option<HttpResponseInfo>,
}

impl ChatStreamState {
    fn new(
        provider: String,
        model_id: String,
        warnings: Vec<Warning>,
        response: Option<HttpResponseInfo>,
    ) -> Self {
        Self {
            provider,
            model_id,
            id: None,
            model: None,
            content: String::new(),
            reasoning: String::new(),
            tool_calls: BTreeMap::new(),
            finish_reason: FinishReason::Unknown,
            usage: None,
            warnings,
            response,
        }
    }

    fn metadata(&self) -> ResponseMetadata {
        ResponseMetadata {
            id: self.id.clone(),
            model: Some(self.model.clone().unwrap_or_else(|| self.model_id.clone())),
            created: Some(chrono::Utc::now()),
            provider: self.provider.clone(),
        }
    }

    fn process_chunk(&mut self, chunk: &Value) -> Vec<ChatStreamEvent> {
        let mut events = Vec::new();

        if self.id.is_none() {
            self.id = chunk.get("id").and_then(Value::as_str).map(str::to_string);
        }
        if self.model.is_none() {
            self.model = chunk
                .get("model")
                .and_then(Value::as_str)
                .map(str::to_string);
        }

        if let Some(usage) = parse_usage(chunk.get("usage")) {
            self.usage = Some(usage.clone());
            events.push(ChatStreamEvent::UsageUpdate { usage });
        }

        let Some(choice) = chunk
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
        else {
            return events;
        };

        if let Some(reason) = choice.get("finish_reason").and_then(Value::as_str) {
            self.finish_reason = FinishReason::from_openai(Some(reason));
        }

        let Some(delta) = choice.get("delta") else {
            return events;
        };
        let index = choice
            .get("index")
            .and_then(Value::as_u64)
            .map(|i| i as usize);

        if let Some(text) = delta
            .get("reasoning_content")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            self.reasoning.push_str(text);
            events.push(ChatStreamEvent::ThinkingDelta {
                delta: text.to_string(),
            });
        }

        if let Some(text) = delta
            .get("content")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            self.content.push_str(text);
            events.push(ChatStreamEvent::ContentDelta {
                delta: text.to_string(),
                index,
            });
        }

        if let Some(calls) = delta.get("tool_calls").and_then(Value::as_array) {
            for (position, call) in calls.iter().enumerate() {
                let slot = call
                    .get("index")
                    .and_then(Value::as_u64)
                    .map(|i| i as usize)
                    .unwrap_or(position);
                let entry = self.tool_calls.entry(slot).or_default();
                let is_new = entry.id.is_empty();
                if let Some(id) = call.get("id").and_then(Value::as_str) {
                    entry.id = id.to_string();
                } else if is_new {
                    entry.id = format!("call_{slot}");
                }

                let function = call.get("function");
                let name = function
                    .and_then(|f| f.get("name"))
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty());
                if let Some(name) = name {
                    entry.name = name.to_string();
                }
                let arguments = function
                    .and_then(|f| f.get("arguments"))
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty());
                if let Some(arguments) = arguments {
                    entry.arguments.push_str(arguments);
                }

                events.push(ChatStreamEvent::ToolCallDelta {
                    id: entry.id.clone(),
                    function_name: name.map(str::to_string),
                    arguments_delta: arguments.map(str::to_string),
                    index: Some(slot),
                });
            }
        }

        events
    }

    fn finish(self) -> ChatResponse {
        ChatResponse {
            id: self.id,
            model: self.model.or(Some(self.model_id)),
            content: (!self.content.is_empty()).then_some(self.content),
            reasoning: (!self.reasoning.is_empty()).then_some(self.reasoning),
            tool_calls: self
                .tool_calls
                .into_values()
                .map(|call| ToolCall {
                    id: call.id,
                    name: call.name,
                    arguments: if call.arguments.is_empty() {
                        "{}".to_string()
                    } else {
                        call.arguments
                    },
                })
                .collect(),
            finish_reason: self.finish_reason,
            usage: self.usage,
            warnings: self.warnings,
            response: self.response,
        }
    }
}

/// Decode an OpenAI-style SSE body into chat events.
///
/// The stream always starts with `StreamStart` and ends with `StreamEnd`
/// unless an error is yielded first. The final response carries the request
/// warnings and the headers of the streaming response.
pub(super) fn chat_event_stream(
    body: ByteStream,
    provider: String,
    model_id: String,
    warnings: Vec<Warning>,
    headers: HashMap<String, String>,
) -> ChatStream {
    let response = HttpResponseInfo::new(model_id.clone(), headers);
    Box::pin(async_stream::try_stream! {
        let mut events = Box::pin(body.eventsource());
        let mut state = ChatStreamState::new(provider, model_id, warnings, Some(response));
        let mut started = false;

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| LlmError::StreamError(e.to_string()))?;
            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }
            if data == "[DONE]" {
                break;
            }

            let chunk: Value = serde_json::from_str(data)
                .map_err(|e| LlmError::ParseError(format!("Invalid stream chunk: {e}")))?;
            tracing::trace!(provider = %state.provider, "stream chunk");

            if let Some(error) = chunk.get("error") {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                Err::<(), LlmError>(LlmError::StreamError(message))?;
            }

            if !started {
                started = true;
                yield ChatStreamEvent::StreamStart { metadata: state.metadata() };
            }
            for event in state.process_chunk(&chunk) {
                yield event;
            }
        }

        if !started {
            yield ChatStreamEvent::StreamStart { metadata: state.metadata() };
        }
        yield ChatStreamEvent::StreamEnd { response: state.finish() };
    })
}

/// Replay a complete response as a stream.
pub(super) fn simulated_chat_stream(response: ChatResponse, provider: String) -> ChatStream {
    let mut events = vec![ChatStreamEvent::StreamStart {
        metadata: ResponseMetadata {
            id: response.id.clone(),
            model: response.model.clone(),
            created: Some(chrono::Utc::now()),
            provider,
        },
    }];
    if let Some(reasoning) = &response.reasoning {
        events.push(ChatStreamEvent::ThinkingDelta {
            delta: reasoning.clone(),
        });
    }
    if let Some(content) = &response.content {
        events.push(ChatStreamEvent::ContentDelta {
            delta: content.clone(),
            index: Some(0),
        });
    }
    for (index, call) in response.tool_calls.iter().enumerate() {
        events.push(ChatStreamEvent::ToolCallDelta {
            id: call.id.clone(),
            function_name: Some(call.name.clone()),
            arguments_delta: Some(call.arguments.clone()),
            index: Some(index),
        });
    }
    if let Some(usage) = &response.usage {
        events.push(ChatStreamEvent::UsageUpdate {
            usage: usage.clone(),
        });
    }
    events.push(ChatStreamEvent::StreamEnd { response });

    Box::pin(futures::stream::iter(events.into_iter().map(Ok)))
}
