//! Request/response types shared by the model implementations.

pub mod chat;
pub mod common;
pub mod completion;
pub mod embedding;
pub mod http;
pub mod image;

pub use chat::*;
pub use common::*;
pub use completion::*;
pub use embedding::*;
pub use http::*;
pub use image::*;
