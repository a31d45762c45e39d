//! OpenAI-compatible models.
//!
//! Each model takes `(model_id, settings, config)`. The config carries
//! everything provider-specific: the provider tag, a URL resolver, a header
//! resolver evaluated per request, and an optional transport override.

pub mod chat;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod errors;
mod stream;

pub use chat::{OpenAiCompatibleChatLanguageModel, OpenAiCompatibleChatSettings};
pub use completion::{OpenAiCompatibleCompletionLanguageModel, OpenAiCompatibleCompletionSettings};
pub use config::{HeadersResolver, OpenAiCompatibleConfig, UrlOptions, UrlResolver};
pub use embedding::{OpenAiCompatibleEmbeddingModel, OpenAiCompatibleEmbeddingSettings};
pub use errors::classify_openai_compatible_http_error;
