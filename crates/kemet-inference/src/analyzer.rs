//! The analysis orchestrator.
//!
//! [`ArtAnalyzer::analyze`] is the single entry point: it checks the
//! credential, validates the image payload, builds the multimodal request,
//! drives the bounded retry loop, and coerces the model's output into the
//! fixed record shape. It never panics and never returns an error; every
//! run ends in an [`AnalysisOutcome`] the caller can branch on.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, instrument, warn};

use kemet_core::{
    decode_base64_image, defaults, AnalysisOutcome, AnalysisRequest, ArtAnalysis, DecodedImage,
    Error, Result,
};

use crate::gemini::{
    analysis_response_schema, is_transient, Content, GeminiBackend, GeminiConfig, GenerateRequest,
    GenerationConfig, GenerativeBackend, ModelResponse, Part, ThinkingConfig,
};
use crate::prompt::analysis_prompt;
use crate::repair::{parse_model_json, ParseRung};

/// Orchestrates one analysis call end to end.
pub struct ArtAnalyzer {
    backend: Arc<dyn GenerativeBackend>,
    config: GeminiConfig,
}

impl ArtAnalyzer {
    pub fn new(config: GeminiConfig) -> Self {
        let backend = Arc::new(GeminiBackend::new(config.clone()));
        Self { backend, config }
    }

    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    /// Use a custom backend (tests, alternative transports).
    pub fn with_backend(backend: Arc<dyn GenerativeBackend>, config: GeminiConfig) -> Self {
        Self { backend, config }
    }

    /// Run one analysis to completion.
    ///
    /// The returned duration covers the provider call loop including
    /// backoff sleeps; it is 0.0 when the first call never started
    /// (missing credential, bad payload).
    #[instrument(skip(self, request), fields(
        subsystem = "inference",
        component = "analyzer",
        op = "analyze",
        speed = %request.speed
    ))]
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let mut call_start: Option<tokio::time::Instant> = None;

        match self.run(request, &mut call_start).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let call_duration = call_start
                    .map(|start| start.elapsed().as_secs_f64())
                    .unwrap_or(0.0);
                warn!(error = %err, duration_s = call_duration, "Analysis failed");
                // Precondition failures carry no diagnostic trace.
                let trace = match &err {
                    Error::Config(_) => None,
                    _ => Some(format!("{:#?}", err)),
                };
                AnalysisOutcome::Failure {
                    reason: err.to_string(),
                    call_duration,
                    trace,
                }
            }
        }
    }

    async fn run(
        &self,
        request: &AnalysisRequest,
        call_start: &mut Option<tokio::time::Instant>,
    ) -> Result<AnalysisOutcome> {
        // Credential first: without a key the image is never even decoded.
        if !self.config.has_credential() {
            return Err(Error::Config(
                "No Google API key found in environment variables".to_string(),
            ));
        }

        let image = decode_base64_image(&request.image_data)?;
        let prompt = analysis_prompt(request.image_type);
        let model = request.speed.model_id();

        debug!(
            model,
            image_type = %request.image_type,
            thinking_budget = request.thinking_budget,
            image_b64_len = request.image_data.len(),
            prompt_len = prompt.chars().count(),
            max_retries = defaults::MAX_RETRIES,
            temperature = defaults::TEMPERATURE,
            "Dispatching analysis"
        );

        let wire_request = build_request(&prompt, &image, request.thinking_budget);

        let timer = tokio::time::Instant::now();
        *call_start = Some(timer);
        let response = self.call_with_retry(model, &wire_request).await?;
        let call_duration = timer.elapsed().as_secs_f64();

        let text = response
            .extract_text()
            .ok_or_else(|| Error::Inference("Cannot access response text".to_string()))?;

        debug!(
            response_len = text.chars().count(),
            head = %preview_head(&text),
            tail = %preview_tail(&text),
            "Model response received"
        );

        let (raw, rung) = parse_model_json(&text)?;
        if rung != ParseRung::Direct {
            debug!(?rung, "Recovered JSON through the repair ladder");
        }

        let result: ArtAnalysis = serde_json::from_value(raw.clone()).map_err(|e| {
            Error::Validation(format!("Model output failed shape validation: {}", e))
        })?;

        info!(
            duration_s = call_duration,
            characters = result.characters.len(),
            location = %summary_location(&result.picture_location),
            period = %result.date,
            translation_len = result.ancient_text_translation.chars().count(),
            "Analysis complete"
        );

        Ok(AnalysisOutcome::Success {
            result,
            raw,
            call_duration,
        })
    }

    /// Bounded retry around single provider attempts.
    ///
    /// Retry n sleeps 2^(n-1) seconds first; with the default budget that is
    /// three attempts and 1s + 2s of backoff. Only transient failures
    /// re-enter the loop.
    async fn call_with_retry(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<ModelResponse> {
        let mut retry_count: u32 = 0;
        loop {
            if retry_count > 0 {
                let wait_secs = 2u64.pow(retry_count - 1);
                warn!(
                    attempt = retry_count + 1,
                    max_attempts = defaults::MAX_RETRIES + 1,
                    wait_secs,
                    "Retrying Gemini call after backoff"
                );
                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
            }

            match self.backend.generate(model, request).await {
                Ok(response) => return Ok(response),
                Err(err) if is_transient(&err) && retry_count < defaults::MAX_RETRIES => {
                    warn!(
                        error = %err,
                        retry = retry_count + 1,
                        max_retries = defaults::MAX_RETRIES,
                        "Transient Gemini failure"
                    );
                    retry_count += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn build_request(prompt: &str, image: &DecodedImage, thinking_budget: i32) -> GenerateRequest {
    // Re-encode the validated bytes so the provider sees canonical base64.
    let data = STANDARD.encode(&image.bytes);
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part::text(prompt),
                Part::inline_image(image.mime_type, data),
            ],
        }],
        generation_config: Some(GenerationConfig {
            temperature: Some(defaults::TEMPERATURE),
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(analysis_response_schema()),
            thinking_config: Some(ThinkingConfig { thinking_budget }),
        }),
    }
}

fn preview_head(text: &str) -> String {
    text.chars().take(defaults::RAW_PREVIEW_HEAD).collect()
}

fn preview_tail(text: &str) -> String {
    let total = text.chars().count();
    text.chars()
        .skip(total.saturating_sub(defaults::RAW_PREVIEW_TAIL))
        .collect()
}

fn summary_location(location: &str) -> String {
    if location.chars().count() > 50 {
        let head: String = location.chars().take(50).collect();
        format!("{}...", head)
    } else {
        location.to_string()
    }
}
