//! Transient-failure classification for the retry loop.
//!
//! Gemini surfaces overload and quota conditions through status codes and
//! message text rather than a stable error taxonomy, so classification works
//! on the rendered error message. The backend keeps status codes inside the
//! messages it builds (see [`super::backend`]) so the numeric markers here
//! stay reliable.

use kemet_core::Error;

/// Substrings that mark a retry-eligible provider failure.
///
/// Matching is lowercase `contains`; numeric entries catch embedded HTTP
/// status codes.
const TRANSIENT_MARKERS: [&str; 10] = [
    "500",
    "502",
    "503",
    "504",
    "429",
    "rate limit",
    "quota",
    "internal error",
    "service unavailable",
    "timeout",
];

/// Whether this error is worth retrying.
pub fn is_transient(err: &Error) -> bool {
    is_transient_message(&err.to_string())
}

/// Whether an error message matches any transient marker.
pub fn is_transient_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lowered.contains(m))
}
