//! Protocol standards.
//!
//! DeepInfra speaks the OpenAI-like protocol for chat, completion and
//! embeddings; those models live in `openai_compatible` and are configured by
//! the provider.

pub mod openai_compatible;
