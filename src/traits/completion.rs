//! Text completion capability trait

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

#[async_trait]
pub trait CompletionCapability: Send + Sync {
    async fn complete_request(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LlmError>;

    async fn complete(&self, prompt: String) -> Result<String, LlmError> {
        let response = self.complete_request(CompletionRequest::new(prompt)).await?;
        Ok(response.text)
    }
}
