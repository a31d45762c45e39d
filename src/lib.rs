//! siumai-provider-deepinfra
//!
//! DeepInfra provider for siumai. DeepInfra serves an OpenAI-like protocol under
//! `/v1/openai` and a native inference API under `/v1/inference`; this crate wires
//! both into one provider object.
//!
//! # Example
//! ```rust,no_run
//! use siumai_provider_deepinfra::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let deepinfra = create_deepinfra(DeepInfraProviderSettings::new().api_key("your-api-key"));
//!
//!     let model = deepinfra.chat_model(models::chat::LLAMA_3_3_70B_INSTRUCT);
//!     let response = model.chat(vec![ChatMessage::user("Hello, DeepInfra!")]).await?;
//!     println!("{}", response.content_text().unwrap_or_default());
//!     Ok(())
//! }
//! ```
#![deny(unsafe_code)]

pub mod defaults;
pub mod error;
pub mod execution;
pub mod providers;
pub mod standards;
pub mod streaming;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::LlmError;
pub use providers::deepinfra::{
    DeepInfraProvider, DeepInfraProviderSettings, create_deepinfra, deepinfra, models,
};

/// Commonly used items.
pub mod prelude {
    pub use crate::error::LlmError;
    pub use crate::execution::http::transport::{HttpTransport, ReqwestTransport};
    pub use crate::providers::deepinfra::{
        DeepInfraChatSettings, DeepInfraCompletionSettings, DeepInfraEmbeddingSettings,
        DeepInfraImageModel, DeepInfraImageSettings, DeepInfraProvider,
        DeepInfraProviderSettings, create_deepinfra, deepinfra, models,
    };
    pub use crate::standards::openai_compatible::{
        OpenAiCompatibleChatLanguageModel, OpenAiCompatibleCompletionLanguageModel,
        OpenAiCompatibleEmbeddingModel,
    };
    pub use crate::streaming::{ChatStream, ChatStreamEvent};
    pub use crate::traits::{
        ChatCapability, CompletionCapability, EmbeddingCapability, ImageGenerationCapability,
        ProviderFactory,
    };
    pub use crate::types::*;
}
