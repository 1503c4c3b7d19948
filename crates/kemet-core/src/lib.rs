//! # kemet-core
//!
//! Core types, errors, and shared abstractions for the Kemet Egyptian art
//! analysis service.
//!
//! This crate defines:
//! - The unified [`Error`] type and [`Result`] alias
//! - Domain models: [`ArtAnalysis`], [`Character`], [`AnalysisOutcome`]
//! - Request parameters: [`SpeedTier`], [`ImageTypeHint`], [`AnalysisRequest`]
//! - Image payload decoding and MIME sniffing ([`image`])
//! - Service-wide defaults and environment variable names ([`defaults`])
//! - Canonical structured-logging field names ([`logging`])

pub mod defaults;
pub mod error;
pub mod image;
pub mod logging;
pub mod models;

pub use error::{Error, Result};
pub use image::{decode_base64_image, detect_image_mime, DecodedImage};
pub use models::{
    AnalysisOutcome, AnalysisRequest, ArtAnalysis, Character, ImageTypeHint, SpeedTier,
};
