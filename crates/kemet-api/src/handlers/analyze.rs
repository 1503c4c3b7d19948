//! Image analysis endpoint.
//!
//! The response body always has the same shape: every field is present on
//! success, and failures carry the same fields nulled out plus an `error`
//! string. Browser clients bind to one record type either way.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use utoipa::ToSchema;

use kemet_core::{
    defaults, AnalysisOutcome, AnalysisRequest, ArtAnalysis, Character, ImageTypeHint, SpeedTier,
};

use crate::AppState;

// =============================================================================
// REQUEST / RESPONSE TYPES
// =============================================================================

/// Analysis request payload.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct AnalyzeImageRequest {
    /// Base64-encoded image bytes.
    image: String,
    /// Speed tier: "regular", "fast" (default) or "super-fast".
    speed: String,
    /// Scene hint: "tomb", "temple", "other" or "unknown".
    #[serde(rename = "imageType")]
    image_type: String,
}

/// Fixed-shape analysis response.
///
/// `error` is omitted on success; every other field is always present.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeImageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    translation: Option<String>,
    characters: Vec<Character>,
    location: Option<String>,
    processing_time: String,
    interesting_detail: Option<String>,
    date: Option<String>,
}

impl AnalyzeImageResponse {
    fn success(result: ArtAnalysis, call_duration: f64) -> Self {
        Self {
            error: None,
            translation: Some(result.ancient_text_translation),
            characters: result.characters,
            location: Some(result.picture_location),
            processing_time: format!("Analysis completed in {:.2}s", call_duration),
            interesting_detail: Some(result.interesting_detail),
            date: Some(result.date),
        }
    }

    fn failure(error: impl Into<String>, processing_time: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            translation: None,
            characters: Vec::new(),
            location: None,
            processing_time: processing_time.into(),
            interesting_detail: None,
            date: None,
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Analyze a photograph of ancient Egyptian art.
#[utoipa::path(
    post,
    path = "/api/v1/analyze",
    tag = "Analysis",
    request_body = AnalyzeImageRequest,
    responses(
        (status = 200, description = "Analysis completed", body = AnalyzeImageResponse),
        (status = 400, description = "Malformed request", body = AnalyzeImageResponse),
        (status = 500, description = "Analysis failed", body = AnalyzeImageResponse)
    )
)]
pub async fn analyze_image(State(state): State<AppState>, body: String) -> Response {
    // The body arrives raw so malformed JSON maps to our fixed error shape
    // instead of axum's plain-text rejection.
    if body.is_empty() {
        return bad_request("No request body provided");
    }

    let value: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => return bad_request("Invalid JSON in request body"),
    };

    // Non-string fields are treated as absent.
    let request = AnalyzeImageRequest {
        image: string_field(&value, "image", ""),
        speed: string_field(&value, "speed", "fast"),
        image_type: string_field(&value, "imageType", "unknown"),
    };

    if request.image.is_empty() {
        return bad_request("No image data provided in request");
    }
    if STANDARD.decode(&request.image).is_err() {
        return bad_request("Invalid image data. Must be base64 encoded.");
    }

    // Unrecognized tier or hint values degrade to the defaults.
    let speed = SpeedTier::from_str_loose(&request.speed).unwrap_or_default();
    let image_type = ImageTypeHint::from_str_loose(&request.image_type).unwrap_or_default();

    info!(
        speed = %speed,
        image_type = %image_type,
        image_b64_len = request.image.len(),
        "Received analysis request"
    );

    let analysis_request = AnalysisRequest {
        image_data: request.image,
        speed,
        image_type,
        thinking_budget: defaults::THINKING_BUDGET,
    };

    match state.analyzer.analyze(&analysis_request).await {
        AnalysisOutcome::Success {
            result,
            call_duration,
            ..
        } => (
            StatusCode::OK,
            Json(AnalyzeImageResponse::success(result, call_duration)),
        )
            .into_response(),
        AnalysisOutcome::Failure {
            reason,
            call_duration,
            trace,
        } => {
            warn!(error = %reason, duration_s = call_duration, "Returning analysis failure");
            let mut error = reason;
            if let Some(trace) = trace {
                error.push_str(&format!("\n\nDebug trace:\n{}", trace));
            }
            let response = AnalyzeImageResponse::failure(
                error,
                format!("Failed after {:.2}s", call_duration),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}

/// Browsers preflight cross-origin POSTs; the CORS layer adds the headers.
pub async fn analyze_preflight() -> StatusCode {
    StatusCode::OK
}

/// Non-POST methods get the fixed error shape rather than a bare 405.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(AnalyzeImageResponse::failure(
            "Method not allowed. Only POST requests are supported.",
            "Request failed",
        )),
    )
        .into_response()
}

fn string_field(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(AnalyzeImageResponse::failure(message, "Request failed")),
    )
        .into_response()
}

// =============================================================================
// TESTS
// =============================================================================
