//! DeepInfra provider.
//!
//! Chat, completion and embedding models use DeepInfra's OpenAI-compatible
//! endpoints under `{base_url}/openai`; image models use the native inference
//! API under `{base_url}/inference`.
//!
//! # Example
//! ```rust,no_run
//! use siumai_provider_deepinfra::prelude::*;
//!
//! # async fn run() -> Result<(), LlmError> {
//! let provider = deepinfra();
//! let embedder = provider.text_embedding_model(models::embedding::BGE_LARGE_EN_V1_5);
//! let response = embedder.embed(vec!["hello".to_string()]).await?;
//! println!("dimension = {}", response.dimension());
//! # Ok(())
//! # }
//! ```

pub mod image;
pub mod models;
mod provider;
mod settings;

pub use image::{DeepInfraImageModel, DeepInfraImageModelConfig};
pub use provider::{DeepInfraProvider, create_deepinfra, deepinfra};
pub use settings::{
    DeepInfraChatSettings, DeepInfraCompletionSettings, DeepInfraEmbeddingSettings,
    DeepInfraImageSettings, DeepInfraProviderSettings,
};
