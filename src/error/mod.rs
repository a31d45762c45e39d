//! Error Handling Module
//!
//! Core error type (`LlmError`) plus conversions from common error types.
//!
//! # Example
//!
//! ```rust,ignore
//! use siumai_provider_deepinfra::error::LlmError;
//!
//! let error = LlmError::api_error(404, "Not found");
//! assert_eq!(error.status_code(), Some(404));
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;
