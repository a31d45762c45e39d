//! Provider implementations.

pub mod deepinfra;
