//! Best-effort JSON recovery from model output.
//!
//! Structured output mode nominally returns bare JSON, but fenced and
//! prose-wrapped responses still occur. Recovery runs through an ordered
//! ladder of pure transforms, each strictly more aggressive than the last:
//!
//! 1. parse the raw text as-is
//! 2. strip markdown code fences, then parse
//! 3. regex-extract the outermost `{...}` span, then parse
//!
//! The first rung that yields valid JSON wins. If all three fail, the error
//! carries a truncated copy of the raw text for diagnosis.

use regex::Regex;
use serde_json::Value;

use kemet_core::{defaults, Error, Result};

/// Which rung of the recovery ladder produced a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseRung {
    /// The raw text parsed as-is.
    Direct,
    /// Parsed after stripping markdown code fences.
    Fenced,
    /// Parsed after extracting the outermost brace span.
    Extracted,
}

/// Parse model output into JSON, recovering from common wrapping.
pub fn parse_model_json(text: &str) -> Result<(Value, ParseRung)> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok((value, ParseRung::Direct));
    }

    let cleaned = strip_fences(text);
    if let Ok(value) = serde_json::from_str(cleaned) {
        return Ok((value, ParseRung::Fenced));
    }

    // (?s) so `.` crosses newlines; greedy so nested objects stay whole.
    let object_re = Regex::new(r"(?s)\{.*\}").unwrap();
    match object_re.find(cleaned) {
        Some(found) => match serde_json::from_str(found.as_str()) {
            Ok(value) => Ok((value, ParseRung::Extracted)),
            Err(_) => Err(Error::Inference(format!(
                "Could not parse model response as JSON. Raw response: {}...",
                truncate_raw(text)
            ))),
        },
        None => Err(Error::Inference(format!(
            "No JSON found in model response. Raw response: {}...",
            truncate_raw(text)
        ))),
    }
}

/// Strip a leading ```` ```json ```` fence and a trailing ```` ``` ```` fence.
///
/// The two strips are independent: a response with only one half of the
/// fence still loses that half.
fn strip_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// First `RAW_TRUNCATE_LEN` characters of the raw text, for error messages.
/// Counts characters, not bytes, so multibyte output cannot split a char.
fn truncate_raw(text: &str) -> String {
    text.chars().take(defaults::RAW_TRUNCATE_LEN).collect()
}
