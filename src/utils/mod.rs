//! Small helpers used by the provider and models.

pub mod api_key;
pub mod url;
