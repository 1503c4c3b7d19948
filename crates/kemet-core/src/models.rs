//! Domain models for Egyptian art analysis.
//!
//! The record shapes here mirror the structured output contract given to the
//! model: [`ArtAnalysis`] is the validated result, [`AnalysisOutcome`] is the
//! envelope callers receive whether the call succeeded or not.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Speed tier selecting which Gemini model serves the request.
///
/// Unrecognized tier strings degrade to [`SpeedTier::Fast`] rather than
/// erroring; use [`SpeedTier::from_str_loose`] with `unwrap_or_default()`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum SpeedTier {
    /// Highest quality, slowest responses.
    Regular,
    /// Balanced quality and latency.
    #[default]
    Fast,
    /// Lowest latency, lightest model.
    SuperFast,
}

impl SpeedTier {
    /// Parse a tier from user input, tolerating case and surrounding space.
    ///
    /// Returns `None` for unrecognized values so callers can fall back to
    /// the default tier.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Some(Self::Regular),
            "fast" => Some(Self::Fast),
            "super-fast" => Some(Self::SuperFast),
            _ => None,
        }
    }

    /// The Gemini model identifier this tier maps to.
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Regular => defaults::MODEL_REGULAR,
            Self::Fast => defaults::MODEL_FAST,
            Self::SuperFast => defaults::MODEL_SUPER_FAST,
        }
    }
}

impl std::fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Fast => write!(f, "fast"),
            Self::SuperFast => write!(f, "super-fast"),
        }
    }
}

/// Optional hint about what kind of site the photograph shows.
///
/// [`ImageTypeHint::Unknown`] is the neutral value and adds nothing to the
/// prompt; any other variant appends a hint clause.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageTypeHint {
    Tomb,
    Temple,
    Other,
    #[default]
    Unknown,
}

impl ImageTypeHint {
    /// Parse a hint from user input, tolerating case and surrounding space.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tomb" => Some(Self::Tomb),
            "temple" => Some(Self::Temple),
            "other" => Some(Self::Other),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageTypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tomb => write!(f, "tomb"),
            Self::Temple => write!(f, "temple"),
            Self::Other => write!(f, "other"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One identified figure in the artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Character {
    /// Name of the character, deity, or person identified in the scene.
    #[serde(rename = "character_name")]
    pub name: String,
    /// Why this identification was made (regalia, iconography, context).
    pub reasoning: String,
    /// Description and interesting facts about this character.
    pub description: String,
    /// Approximate position in the image ("far left", "center", ...).
    pub location: String,
}

/// Validated analysis record produced by the model.
///
/// All fields are required; a response missing any of them fails shape
/// validation and the whole call is reported as a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ArtAnalysis {
    /// Best guess at where the photograph was taken.
    pub picture_location: String,
    /// Historical period the artwork was produced in.
    pub date: String,
    /// Figures identified in the scene. Empty when none are depicted.
    pub characters: Vec<Character>,
    /// Translation attempt for any hieroglyphs or ancient text.
    pub ancient_text_translation: String,
    /// One detail an amateur would miss but an expert would find fascinating.
    pub interesting_detail: String,
}

/// Parameters for a single analysis call.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Base64-encoded image payload.
    pub image_data: String,
    /// Model selection tier.
    pub speed: SpeedTier,
    /// Optional site-type hint folded into the prompt.
    pub image_type: ImageTypeHint,
    /// Token budget for the model's internal reasoning.
    pub thinking_budget: i32,
}

impl AnalysisRequest {
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            image_data: image_data.into(),
            speed: SpeedTier::default(),
            image_type: ImageTypeHint::default(),
            thinking_budget: defaults::THINKING_BUDGET,
        }
    }
}

/// Terminal result of an analysis call.
///
/// Analysis never panics or propagates errors to the caller; every run ends
/// in one of these two variants. The serialized form uses a `failure_status`
/// discriminator so downstream consumers can branch on a single field.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "failure_status")]
pub enum AnalysisOutcome {
    #[serde(rename = "success")]
    Success {
        /// The validated analysis record.
        #[serde(rename = "analysis")]
        result: ArtAnalysis,
        /// The parsed JSON exactly as the model produced it.
        #[serde(rename = "raw_response")]
        raw: serde_json::Value,
        /// Seconds spent in the provider call loop, including backoff.
        #[serde(rename = "api_call_duration")]
        call_duration: f64,
    },
    #[serde(rename = "api_failure")]
    Failure {
        /// Human-readable description of what went wrong.
        #[serde(rename = "failure_reason")]
        reason: String,
        /// Seconds elapsed when the failure was captured; 0.0 if the
        /// provider call never started.
        #[serde(rename = "api_call_duration")]
        call_duration: f64,
        /// Diagnostic detail for debugging, absent for precondition
        /// failures such as a missing credential.
        #[serde(rename = "traceback", skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
    },
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn call_duration(&self) -> f64 {
        match self {
            Self::Success { call_duration, .. } | Self::Failure { call_duration, .. } => {
                *call_duration
            }
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ===== Speed tiers =====

    #[test]
    fn test_speed_tier_model_mapping() {
        assert_eq!(SpeedTier::Regular.model_id(), "gemini-2.5-pro");
        assert_eq!(SpeedTier::Fast.model_id(), "gemini-2.5-flash");
        assert_eq!(SpeedTier::SuperFast.model_id(), "gemini-2.5-flash-lite");
    }

    #[test]
    fn test_speed_tier_default_is_fast() {
        assert_eq!(SpeedTier::default(), SpeedTier::Fast);
    }

    #[test]
    fn test_speed_tier_from_str_loose() {
        assert_eq!(SpeedTier::from_str_loose("regular"), Some(SpeedTier::Regular));
        assert_eq!(SpeedTier::from_str_loose("FAST"), Some(SpeedTier::Fast));
        assert_eq!(
            SpeedTier::from_str_loose(" super-fast "),
            Some(SpeedTier::SuperFast)
        );
        assert_eq!(SpeedTier::from_str_loose("turbo"), None);
        assert_eq!(SpeedTier::from_str_loose(""), None);
    }

    #[test]
    fn test_unknown_tier_degrades_to_fast() {
        let tier = SpeedTier::from_str_loose("warp").unwrap_or_default();
        assert_eq!(tier, SpeedTier::Fast);
    }

    #[test]
    fn test_speed_tier_serde_wire_names() {
        assert_eq!(
            serde_json::to_string(&SpeedTier::SuperFast).unwrap(),
            "\"super-fast\""
        );
        let tier: SpeedTier = serde_json::from_str("\"regular\"").unwrap();
        assert_eq!(tier, SpeedTier::Regular);
    }

    #[test]
    fn test_speed_tier_display() {
        assert_eq!(SpeedTier::Regular.to_string(), "regular");
        assert_eq!(SpeedTier::SuperFast.to_string(), "super-fast");
    }

    // ===== Image type hints =====

    #[test]
    fn test_image_type_hint_from_str_loose() {
        assert_eq!(ImageTypeHint::from_str_loose("tomb"), Some(ImageTypeHint::Tomb));
        assert_eq!(
            ImageTypeHint::from_str_loose("Temple"),
            Some(ImageTypeHint::Temple)
        );
        assert_eq!(ImageTypeHint::from_str_loose("other"), Some(ImageTypeHint::Other));
        assert_eq!(ImageTypeHint::from_str_loose("pyramid"), None);
    }

    #[test]
    fn test_image_type_hint_default_is_unknown() {
        assert_eq!(ImageTypeHint::default(), ImageTypeHint::Unknown);
    }

    // ===== Analysis records =====

    fn sample_analysis_json() -> serde_json::Value {
        json!({
            "picture_location": "Valley of the Kings, Tomb of Tutankhamun (KV62)",
            "date": "New Kingdom",
            "characters": [{
                "character_name": "Osiris",
                "reasoning": "Green skin, atef crown, crook and flail",
                "description": "God of the afterlife and rebirth",
                "location": "center"
            }],
            "ancient_text_translation": "Cartouche reads Nebkheperure",
            "interesting_detail": "The leopard skin marks the sem-priest ritual"
        })
    }

    #[test]
    fn test_art_analysis_deserializes_full_record() {
        let analysis: ArtAnalysis = serde_json::from_value(sample_analysis_json()).unwrap();
        assert_eq!(analysis.characters.len(), 1);
        assert_eq!(analysis.characters[0].name, "Osiris");
        assert_eq!(analysis.date, "New Kingdom");
    }

    #[test]
    fn test_art_analysis_missing_field_fails() {
        let mut value = sample_analysis_json();
        value.as_object_mut().unwrap().remove("date");
        let result: std::result::Result<ArtAnalysis, _> = serde_json::from_value(value);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("date"));
    }

    #[test]
    fn test_art_analysis_tolerates_extra_fields() {
        let mut value = sample_analysis_json();
        value
            .as_object_mut()
            .unwrap()
            .insert("confidence".to_string(), json!(0.9));
        let analysis: ArtAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(analysis.characters.len(), 1);
    }

    #[test]
    fn test_character_serializes_wire_field_name() {
        let character = Character {
            name: "Anubis".to_string(),
            reasoning: "Jackal head".to_string(),
            description: "God of mummification".to_string(),
            location: "far left".to_string(),
        };
        let value = serde_json::to_value(&character).unwrap();
        assert_eq!(value["character_name"], "Anubis");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_empty_characters_allowed() {
        let mut value = sample_analysis_json();
        value["characters"] = json!([]);
        let analysis: ArtAnalysis = serde_json::from_value(value).unwrap();
        assert!(analysis.characters.is_empty());
    }

    // ===== Outcome envelope =====

    #[test]
    fn test_success_outcome_serialization() {
        let analysis: ArtAnalysis = serde_json::from_value(sample_analysis_json()).unwrap();
        let outcome = AnalysisOutcome::Success {
            result: analysis,
            raw: sample_analysis_json(),
            call_duration: 3.21,
        };
        assert!(outcome.is_success());
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["failure_status"], "success");
        assert_eq!(value["api_call_duration"], 3.21);
        assert_eq!(value["analysis"]["date"], "New Kingdom");
        assert_eq!(value["raw_response"]["date"], "New Kingdom");
    }

    #[test]
    fn test_failure_outcome_serialization() {
        let outcome = AnalysisOutcome::Failure {
            reason: "Gemini API error (503): overloaded".to_string(),
            call_duration: 1.5,
            trace: Some("Inference(...)".to_string()),
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_reason().unwrap(), "Gemini API error (503): overloaded");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["failure_status"], "api_failure");
        assert_eq!(value["traceback"], "Inference(...)");
    }

    #[test]
    fn test_failure_outcome_omits_absent_trace() {
        let outcome = AnalysisOutcome::Failure {
            reason: "no credential".to_string(),
            call_duration: 0.0,
            trace: None,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("traceback").is_none());
        assert_eq!(value["api_call_duration"], 0.0);
    }

    #[test]
    fn test_outcome_call_duration_accessor() {
        let outcome = AnalysisOutcome::Failure {
            reason: "x".to_string(),
            call_duration: 2.0,
            trace: None,
        };
        assert_eq!(outcome.call_duration(), 2.0);
    }
}
