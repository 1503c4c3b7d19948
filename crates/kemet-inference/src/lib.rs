//! # kemet-inference
//!
//! Gemini-backed vision inference for the Kemet Egyptian art analyzer.
//!
//! The crate is layered so that retry policy, prompt construction, and JSON
//! recovery stay independent of the HTTP transport:
//!
//! - [`gemini`]: REST backend speaking the `generateContent` wire format,
//!   plus the [`gemini::GenerativeBackend`] trait seam (one call = one
//!   provider attempt)
//! - [`prompt`]: the Egyptologist analysis prompt
//! - [`repair`]: best-effort JSON recovery from fenced or prose-wrapped output
//! - [`analyzer`]: the orchestrator that ties them together behind a
//!   never-failing [`kemet_core::AnalysisOutcome`] envelope
//!
//! # Example
//!
//! ```rust,no_run
//! use kemet_core::AnalysisRequest;
//! use kemet_inference::ArtAnalyzer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let analyzer = ArtAnalyzer::from_env();
//!     let request = AnalysisRequest::new("aGVsbG8=");
//!     let outcome = analyzer.analyze(&request).await;
//!     println!("success: {}", outcome.is_success());
//! }
//! ```

pub mod analyzer;
pub mod gemini;
pub mod prompt;
pub mod repair;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types for convenience
pub use kemet_core::*;

pub use analyzer::ArtAnalyzer;
pub use gemini::{GeminiBackend, GeminiConfig, GenerativeBackend, ModelResponse};
pub use prompt::analysis_prompt;
pub use repair::{parse_model_json, ParseRung};
