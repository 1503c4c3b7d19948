//! Gemini REST inference backend.
//!
//! This module speaks the `generateContent` wire format of the Google
//! Generative Language API:
//!
//! - Multimodal requests (text prompt + inline base64 image)
//! - Structured output via `response_schema` and a JSON response MIME type
//! - Thinking budget control
//!
//! The [`GenerativeBackend`] trait is the seam between transport and policy:
//! one `generate` call is exactly one provider attempt, and the retry loop
//! in [`crate::analyzer`] decides what happens after a failure using
//! [`is_transient`].
//!
//! # Example
//!
//! ```rust,no_run
//! use kemet_inference::gemini::{GeminiBackend, GeminiConfig};
//!
//! let config = GeminiConfig {
//!     base_url: "https://generativelanguage.googleapis.com".to_string(),
//!     api_key: Some("...".to_string()),
//!     timeout_secs: 120,
//! };
//! let backend = GeminiBackend::new(config);
//! ```

mod backend;
mod error;
mod types;

pub use backend::{GeminiBackend, GeminiConfig, GenerativeBackend};
pub use error::{is_transient, is_transient_message};
pub use types::{
    analysis_response_schema, Content, GenerateRequest, GenerationConfig, InlineData,
    ModelResponse, Part, ThinkingConfig,
};
