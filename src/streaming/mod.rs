//! Streaming types.

use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::LlmError;
use crate::types::{ChatResponse, ResponseMetadata, Usage};

/// Chat streaming event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatStreamEvent {
    /// First event of every stream.
    StreamStart { metadata: ResponseMetadata },
    /// Incremental text.
    ContentDelta { delta: String, index: Option<usize> },
    /// Incremental reasoning text (`reasoning_content`).
    ThinkingDelta { delta: String },
    /// Tool call delta. `function_name` is set on the first delta of a call.
    ToolCallDelta {
        id: String,
        function_name: Option<String>,
        arguments_delta: Option<String>,
        index: Option<usize>,
    },
    UsageUpdate { usage: Usage },
    /// Last event, carrying the accumulated response.
    StreamEnd { response: ChatResponse },
}

/// Chat stream
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, LlmError>> + Send>>;
