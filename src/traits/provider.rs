//! Provider factory trait.

use std::sync::Arc;

use crate::error::LlmError;
use crate::traits::{ChatCapability, EmbeddingCapability, ImageGenerationCapability};

/// Creates models by id, so generic code can hold any provider.
///
/// Implementations only construct models; no I/O happens here.
pub trait ProviderFactory: Send + Sync {
    fn language_model(&self, model_id: &str) -> Result<Arc<dyn ChatCapability>, LlmError>;

    fn embedding_model(&self, model_id: &str) -> Result<Arc<dyn EmbeddingCapability>, LlmError> {
        Err(LlmError::UnsupportedOperation(format!(
            "{} does not provide embedding model '{model_id}'",
            self.provider_name()
        )))
    }

    fn image_model(
        &self,
        model_id: &str,
    ) -> Result<Arc<dyn ImageGenerationCapability>, LlmError> {
        Err(LlmError::UnsupportedOperation(format!(
            "{} does not provide image model '{model_id}'",
            self.provider_name()
        )))
    }

    fn provider_name(&self) -> &'static str;
}
