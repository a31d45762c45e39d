//! Chat capability trait

use crate::error::LlmError;
use crate::streaming::ChatStream;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, Tool};
use async_trait::async_trait;

#[async_trait]
pub trait ChatCapability: Send + Sync {
    /// Full chat request.
    async fn chat_request(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Full streaming chat request.
    async fn chat_stream_request(&self, request: ChatRequest) -> Result<ChatStream, LlmError>;

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse, LlmError> {
        self.chat_with_tools(messages, None).await
    }

    async fn chat_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponse, LlmError> {
        let mut request = ChatRequest::new(messages);
        request.tools = tools;
        self.chat_request(request).await
    }

    async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatStream, LlmError> {
        let mut request = ChatRequest::new(messages);
        request.tools = tools;
        self.chat_stream_request(request).await
    }

    /// Single-turn convenience returning only the text.
    async fn ask(&self, prompt: String) -> Result<String, LlmError> {
        let response = self.chat(vec![ChatMessage::user(prompt)]).await?;
        response
            .content_text()
            .ok_or_else(|| LlmError::ParseError("No text in response".to_string()))
            .map(std::string::ToString::to_string)
    }
}
