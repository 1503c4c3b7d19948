//! Scripted mock backend for retry and envelope tests.
//!
//! Unlike a recording fake, this backend replays an explicit script: each
//! `generate` call consumes the next queued outcome. Exhausting the script
//! is a test bug and fails loudly.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use kemet_core::{Error, Result};

use crate::gemini::{GenerateRequest, GenerativeBackend, ModelResponse};

/// One recorded provider call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub model: String,
    pub part_count: usize,
    pub has_inline_image: bool,
}

/// Backend that replays a scripted sequence of outcomes.
#[derive(Default)]
pub struct MockGenerativeBackend {
    script: Mutex<VecDeque<Result<ModelResponse>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockGenerativeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next outcome.
    pub fn with_outcome(self, outcome: Result<ModelResponse>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    /// Queue a successful response.
    pub fn with_response(self, response: ModelResponse) -> Self {
        self.with_outcome(Ok(response))
    }

    /// Queue a failure.
    pub fn with_error(self, err: Error) -> Self {
        self.with_outcome(Err(err))
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeBackend for MockGenerativeBackend {
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<ModelResponse> {
        let parts = request.contents.first().map(|c| c.parts.as_slice()).unwrap_or(&[]);
        self.calls.lock().unwrap().push(MockCall {
            model: model.to_string(),
            part_count: parts.len(),
            has_inline_image: parts.iter().any(|p| p.inline_data.is_some()),
        });

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Internal("mock script exhausted".to_string())))
    }
}

/// Wrap an analysis record in the provider's candidates envelope.
pub fn candidates_response(analysis: &Value) -> ModelResponse {
    ModelResponse::new(json!({
        "candidates": [{
            "content": {"parts": [{"text": analysis.to_string()}]}
        }]
    }))
}

/// A complete, valid analysis record.
pub fn sample_analysis() -> Value {
    json!({
        "picture_location": "Valley of the Kings, Tomb of Tutankhamun (KV62)",
        "date": "New Kingdom",
        "characters": [{
            "character_name": "Anubis",
            "reasoning": "Jackal-headed figure performing the Opening of the Mouth",
            "description": "God of embalming and the dead",
            "location": "right side"
        }],
        "ancient_text_translation": "The cartouche reads Nebkheperure, throne name of Tutankhamun",
        "interesting_detail": "The ritual adze is shown with a meteoric iron blade"
    })
}
