//! Capability traits implemented by the model types.

pub mod chat;
pub mod completion;
pub mod embedding;
pub mod image;
pub mod provider;

pub use chat::ChatCapability;
pub use completion::CompletionCapability;
pub use embedding::EmbeddingCapability;
pub use image::ImageGenerationCapability;
pub use provider::ProviderFactory;
