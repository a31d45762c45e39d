//! Image generation capability trait

use crate::error::LlmError;
use crate::types::{ImageGenerationRequest, ImageGenerationResponse};
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationCapability: Send + Sync {
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, LlmError>;

    /// Generate images and return their base64 payloads.
    async fn generate_image(
        &self,
        prompt: String,
        size: Option<String>,
        count: Option<u32>,
    ) -> Result<Vec<String>, LlmError> {
        let request = ImageGenerationRequest {
            prompt,
            size,
            count: count.unwrap_or(1),
            ..Default::default()
        };
        let response = self.generate_images(request).await?;
        Ok(response.images.into_iter().map(|img| img.b64_json).collect())
    }

    fn max_images_per_call(&self) -> u32;
}
