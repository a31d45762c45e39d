//! Embedding capability trait

use crate::error::LlmError;
use crate::types::{EmbeddingRequest, EmbeddingResponse};
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingCapability: Send + Sync {
    async fn embed_request(&self, request: EmbeddingRequest)
    -> Result<EmbeddingResponse, LlmError>;

    async fn embed(&self, input: Vec<String>) -> Result<EmbeddingResponse, LlmError> {
        self.embed_request(EmbeddingRequest::new(input)).await
    }

    /// Upper bound on inputs accepted by a single call.
    fn max_embeddings_per_call(&self) -> usize;

    /// Whether callers may issue several embedding calls concurrently.
    fn supports_parallel_calls(&self) -> bool {
        true
    }
}
