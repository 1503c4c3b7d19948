//! Service-wide defaults and environment variable names.
//!
//! Every tunable in the analysis pipeline is centralized here so that the
//! backend, the HTTP server, and the CLI agree on one set of values.

// ============================================================================
// Credentials
// ============================================================================

/// Primary environment variable holding the Gemini API key.
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Fallback environment variable checked when the primary is unset.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

// ============================================================================
// Gemini endpoint
// ============================================================================

/// Override for the Gemini API base URL (tests point this at a local server).
pub const ENV_GEMINI_BASE_URL: &str = "KEMET_GEMINI_BASE_URL";

/// Default Gemini API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Override for the per-request timeout in seconds.
pub const ENV_GEMINI_TIMEOUT_SECS: &str = "KEMET_GEMINI_TIMEOUT_SECS";

/// Default per-request timeout for generation calls.
pub const GEN_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Model selection
// ============================================================================

/// Model served by the "regular" speed tier.
pub const MODEL_REGULAR: &str = "gemini-2.5-pro";

/// Model served by the "fast" speed tier (the default).
pub const MODEL_FAST: &str = "gemini-2.5-flash";

/// Model served by the "super-fast" speed tier.
pub const MODEL_SUPER_FAST: &str = "gemini-2.5-flash-lite";

// ============================================================================
// Generation parameters
// ============================================================================

/// Sampling temperature for analysis calls. Zero keeps output deterministic
/// enough for structured extraction.
pub const TEMPERATURE: f32 = 0.0;

/// Token budget for the model's internal reasoning phase.
pub const THINKING_BUDGET: i32 = 2000;

// ============================================================================
// Retry policy
// ============================================================================

/// Retries after the initial attempt; total attempts = MAX_RETRIES + 1.
pub const MAX_RETRIES: u32 = 2;

// ============================================================================
// Diagnostics
// ============================================================================

/// Characters of raw model output quoted in parse-failure messages.
pub const RAW_TRUNCATE_LEN: usize = 1000;

/// Characters of raw output logged from the start of a response.
pub const RAW_PREVIEW_HEAD: usize = 500;

/// Characters of raw output logged from the end of a response.
pub const RAW_PREVIEW_TAIL: usize = 200;

/// Provider calls slower than this are logged with `slow = true`.
pub const SLOW_CALL_MS: u64 = 30_000;

// ============================================================================
// HTTP server
// ============================================================================

/// Default port for the API server.
pub const SERVER_PORT: u16 = 3000;

/// Maximum accepted request body size. Sized for base64 phone photos.
pub const MAX_BODY_SIZE_BYTES: usize = 25 * 1024 * 1024;

/// CORS preflight cache lifetime in seconds.
pub const CORS_MAX_AGE_SECS: u64 = 3600;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_are_distinct() {
        assert_ne!(MODEL_REGULAR, MODEL_FAST);
        assert_ne!(MODEL_FAST, MODEL_SUPER_FAST);
        assert_ne!(MODEL_REGULAR, MODEL_SUPER_FAST);
    }

    #[test]
    fn test_retry_budget_is_bounded() {
        assert!(MAX_RETRIES >= 1);
        assert!(MAX_RETRIES <= 5);
    }

    #[test]
    fn test_preview_fits_within_truncation() {
        assert!(RAW_PREVIEW_HEAD <= RAW_TRUNCATE_LEN);
        assert!(RAW_PREVIEW_TAIL < RAW_PREVIEW_HEAD);
    }

    #[test]
    fn test_credential_env_names() {
        assert_eq!(ENV_GOOGLE_API_KEY, "GOOGLE_API_KEY");
        assert_eq!(ENV_GEMINI_API_KEY, "GEMINI_API_KEY");
    }

    #[test]
    fn test_body_limit_fits_large_photos() {
        // 12MB photo -> ~16MB base64, plus JSON framing
        assert!(MAX_BODY_SIZE_BYTES > 16 * 1024 * 1024);
    }
}
