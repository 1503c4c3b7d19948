//! HTTP request handlers.

pub mod analyze;
