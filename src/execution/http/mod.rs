//! HTTP execution layer.

pub mod headers;
pub mod request;
pub mod transport;
