//! Structured logging schema and field name constants for Kemet.
//!
//! All crates use these constants for consistent structured logging fields.
//! This ensures log aggregation tools (Loki, Elasticsearch) can query by
//! standardized field names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, retry or fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), completed analyses |
//! | DEBUG | Decision points, request parameters, response previews |
//! | TRACE | High-volume data (full payloads) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the HTTP layer into provider calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "inference"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "analyzer", "gemini", "repair"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "analyze", "generate"
pub const OPERATION: &str = "op";

// ─── Request fields ────────────────────────────────────────────────────────

/// Model identifier used for the call.
pub const MODEL: &str = "model";

/// Speed tier requested by the caller.
pub const SPEED: &str = "speed";

/// Site-type hint supplied with the request.
pub const IMAGE_TYPE: &str = "image_type";

/// Length of the base64 image payload in characters.
pub const IMAGE_B64_LEN: &str = "image_b64_len";

/// Reasoning token budget passed to the model.
pub const THINKING_BUDGET: &str = "thinking_budget";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Provider call loop duration in seconds, as reported to callers.
pub const DURATION_S: &str = "duration_s";

/// Character length of the prompt sent to the model.
pub const PROMPT_LEN: &str = "prompt_len";

/// Character length of the model response text.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Retry fields ──────────────────────────────────────────────────────────

/// Attempt number within the retry loop (1-based).
pub const ATTEMPT: &str = "attempt";

/// Seconds waited before the current retry.
pub const WAIT_SECS: &str = "wait_secs";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
