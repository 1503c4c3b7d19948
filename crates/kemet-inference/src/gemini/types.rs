//! Wire types for the Gemini `generateContent` endpoint.
//!
//! Request structs serialize with the proto field names (snake_case), which
//! the REST endpoint accepts alongside camelCase. Responses are held as raw
//! JSON so extraction stays tolerant of provider-side shape drift.

use serde::Serialize;
use serde_json::{json, Value};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One conversation turn; analysis requests always send exactly one.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// A single part of a turn: either text or inline binary data.
#[derive(Debug, Clone, Serialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline_image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Generation tuning knobs; absent fields take provider defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

/// Budget for the model's internal reasoning phase.
#[derive(Debug, Clone, Serialize)]
pub struct ThinkingConfig {
    pub thinking_budget: i32,
}

/// Structured output schema for the analysis record.
///
/// The field descriptions are part of the prompt surface: the model reads
/// them when filling the record, so wording changes alter output quality.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "characters": {
                "type": "ARRAY",
                "description": "List of characters/deities/people identified in the scene. Use 'unknown' or 'unidentified' if unclear. Should be empty if there are no clear depiction of characters, or if the picture only shows text/symbols with no clear depiction of characters.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "character_name": {
                            "type": "STRING",
                            "description": "Name of the character/deity/person identified in the scene"
                        },
                        "reasoning": {
                            "type": "STRING",
                            "description": "Explanation of how/why you identified this character (e.g., 'Osiris is wearing his characteristic staff and crown')"
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Description and interesting facts about this character/deity"
                        },
                        "location": {
                            "type": "STRING",
                            "description": "Location of the character in the picture (e.g., 'far left', 'center', 'right side', etc.)"
                        }
                    },
                    "required": ["character_name", "reasoning", "description", "location"]
                }
            },
            "picture_location": {
                "type": "STRING",
                "description": "Your best guess as to where this picture could have been taken - specific Valley of the Kings tomb, temple wall, etc. Use speculative language unless very confident."
            },
            "interesting_detail": {
                "type": "STRING",
                "description": "Highlight an interesting detail of the picture that would be fascinating to a viewer."
            },
            "date": {
                "type": "STRING",
                "description": "Your best guess as to when this may have been produced. Give one of the major Egyptian periods like Old Kingdom, Middle Kingdom, or New Kingdom."
            },
            "ancient_text_translation": {
                "type": "STRING",
                "description": "Attempt to translate any ancient Egyptian text, symbols, or hieroglyphs, or at least try to identify individual elements (e.g., cartouches with royal names or deity names). If unable to translate, speculate about what it could be saying."
            }
        },
        "required": [
            "characters",
            "picture_location",
            "interesting_detail",
            "date",
            "ancient_text_translation"
        ]
    })
}

/// Raw provider response with priority-ordered text extraction.
#[derive(Debug, Clone)]
pub struct ModelResponse(Value);

impl ModelResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The response exactly as the provider returned it.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Extract the response text, trying in order:
    ///
    /// 1. a top-level `text` field
    /// 2. all text parts of the first candidate, joined with newlines
    /// 3. the first part of the first candidate, stringified
    ///
    /// Returns `None` only when no candidate content exists at all.
    pub fn extract_text(&self) -> Option<String> {
        if let Some(text) = self.0.get("text").and_then(Value::as_str) {
            return Some(text.to_string());
        }

        let parts = self
            .0
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .as_array()?;

        let texts: Vec<&str> = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();
        if !texts.is_empty() {
            return Some(texts.join("\n"));
        }

        parts.first().map(|p| p.to_string())
    }
}
