//! Request execution: header handling, transports and the JSON/SSE request helpers
//! shared by every model.

pub mod http;
