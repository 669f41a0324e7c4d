//! Core data types: requests, options, tiers, artifacts and their metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::analysis::ImageAnalysis;

/// The three public operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Enhance,
    GenerateText,
    GenerateReference,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Enhance => write!(f, "enhance image"),
            Operation::GenerateText => write!(f, "generate logo from text"),
            Operation::GenerateReference => write!(f, "create logo from reference"),
        }
    }
}

/// A backend capable of satisfying a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Remote multimodal generation model
    Remote,
    /// Local deterministic pixel transforms
    Raster,
    /// Local vector logo synthesis
    Synthetic,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Remote => write!(f, "remote"),
            Tier::Raster => write!(f, "raster"),
            Tier::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Kind of enhancement applied to an existing image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementType {
    #[default]
    Quality,
    Style,
    Resolution,
}

impl fmt::Display for EnhancementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnhancementType::Quality => write!(f, "quality"),
            EnhancementType::Style => write!(f, "style"),
            EnhancementType::Resolution => write!(f, "resolution"),
        }
    }
}

impl FromStr for EnhancementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "style" => Ok(Self::Style),
            "resolution" => Ok(Self::Resolution),
            other => Err(format!(
                "unknown enhancement type '{other}' (expected quality, style or resolution)"
            )),
        }
    }
}

/// Options for `enhance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementOptions {
    #[serde(rename = "type")]
    pub kind: EnhancementType,

    /// Style variant name ("modern", "vintage", "bold", ...)
    pub style: String,

    /// Free-text instruction appended to the remote enhancement prompt
    pub custom_instruction: Option<String>,
}

impl Default for EnhancementOptions {
    fn default() -> Self {
        Self {
            kind: EnhancementType::Quality,
            style: "modern".to_string(),
            custom_instruction: None,
        }
    }
}

/// Options for `generate_from_text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    pub style: String,

    /// Hex colors; the first is the primary, the second colors the initials
    pub colors: Vec<String>,

    pub business_type: Option<String>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            style: "modern".to_string(),
            colors: Vec::new(),
            business_type: None,
        }
    }
}

/// Options for `generate_from_reference`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceOptions {
    pub business_name: Option<String>,

    /// "similar" keeps the reference style; anything else is applied as a new style
    pub style: String,

    pub modifications: Vec<String>,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        Self {
            business_name: None,
            style: "similar".to_string(),
            modifications: Vec::new(),
        }
    }
}

/// A single request flowing through the tier chain.
///
/// Input images are referenced by their staged path; the staging guard is
/// owned by the orchestrator for the duration of the call.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Enhance {
        image: PathBuf,
        options: EnhancementOptions,
    },
    Text {
        description: String,
        options: TextOptions,
    },
    Reference {
        image: PathBuf,
        options: ReferenceOptions,
    },
}

impl GenerationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            GenerationRequest::Enhance { .. } => Operation::Enhance,
            GenerationRequest::Text { .. } => Operation::GenerateText,
            GenerationRequest::Reference { .. } => Operation::GenerateReference,
        }
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Provenance record attached to every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Tier that produced the artifact
    pub tier_used: Tier,

    /// Remote model identifier (remote tier only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Exact instruction text sent to the remote model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,

    /// Original description (synthetic tier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhancement_type: Option<EnhancementType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instruction: Option<String>,

    /// Dimensions of the input image (raster tier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ImageDimensions>,

    /// Dimensions of the produced image (local tiers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<ImageDimensions>,
}

impl Metadata {
    pub fn for_tier(tier: Tier) -> Self {
        Self {
            tier_used: tier,
            model: None,
            instruction: None,
            style: None,
            colors: Vec::new(),
            business_type: None,
            business_name: None,
            description: None,
            modifications: Vec::new(),
            enhancement_type: None,
            custom_instruction: None,
            source: None,
            output: None,
        }
    }

    /// Copy the request-level fields every tier records.
    pub(crate) fn with_request(mut self, request: &GenerationRequest) -> Self {
        match request {
            GenerationRequest::Enhance { options, .. } => {
                self.enhancement_type = Some(options.kind);
                self.style = Some(options.style.clone());
                self.custom_instruction = options.custom_instruction.clone();
            }
            GenerationRequest::Text {
                description,
                options,
            } => {
                self.style = Some(options.style.clone());
                self.colors = options.colors.clone();
                self.business_type = options.business_type.clone();
                self.description = Some(description.clone());
            }
            GenerationRequest::Reference { options, .. } => {
                self.style = Some(options.style.clone());
                self.business_name = options.business_name.clone();
                self.modifications = options.modifications.clone();
            }
        }
        self
    }
}

/// A persisted image payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique file name within the store
    pub filename: String,

    /// Absolute location on disk
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,

    /// BLAKE3 hex digest of the content
    pub content_hash: String,

    pub created_at: DateTime<Utc>,

    /// The bytes as written
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// Output of a successful tier attempt.
#[derive(Debug, Clone)]
pub struct Generated {
    pub artifact: Artifact,
    pub metadata: Metadata,
}

/// Result of a public operation.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub artifact: Artifact,
    pub metadata: Metadata,

    /// Instruction built for text generation
    pub prompt: Option<String>,

    /// Reference image analysis
    pub analysis: Option<ImageAnalysis>,
}

impl Outcome {
    pub(crate) fn from_generated(generated: Generated) -> Self {
        Self {
            artifact: generated.artifact,
            metadata: generated.metadata,
            prompt: None,
            analysis: None,
        }
    }

    /// Download URL of the artifact under the given prefix.
    pub fn url(&self, download_prefix: &str) -> String {
        format!(
            "{}/{}",
            download_prefix.trim_end_matches('/'),
            self.artifact.filename
        )
    }

    /// Caller-facing response shape.
    pub fn to_response(&self, download_prefix: &str) -> GenerationResponse {
        GenerationResponse {
            filename: self.artifact.filename.clone(),
            url: self.url(download_prefix),
            prompt: self.prompt.clone(),
            analysis: self.analysis.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Serializable response returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub filename: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ImageAnalysis>,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhancement_type_parse() {
        assert_eq!("quality".parse::<EnhancementType>(), Ok(EnhancementType::Quality));
        assert_eq!(" Style ".parse::<EnhancementType>(), Ok(EnhancementType::Style));
        assert_eq!("resolution".parse::<EnhancementType>(), Ok(EnhancementType::Resolution));
        assert!("sharpen".parse::<EnhancementType>().is_err());
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        let json = serde_json::to_string(&Tier::Synthetic).unwrap();
        assert_eq!(json, "\"synthetic\"");
    }

    #[test]
    fn test_metadata_skips_empty_fields() {
        let metadata = Metadata::for_tier(Tier::Raster);
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["tier_used"], "raster");
        assert!(json.get("colors").is_none());
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_metadata_with_text_request() {
        let request = GenerationRequest::Text {
            description: "Logo for Acme".into(),
            options: TextOptions {
                colors: vec!["#ff0000".into()],
                business_type: Some("retail".into()),
                ..TextOptions::default()
            },
        };
        let metadata = Metadata::for_tier(Tier::Synthetic).with_request(&request);
        assert_eq!(metadata.style.as_deref(), Some("modern"));
        assert_eq!(metadata.colors, vec!["#ff0000".to_string()]);
        assert_eq!(metadata.business_type.as_deref(), Some("retail"));
        assert_eq!(metadata.description.as_deref(), Some("Logo for Acme"));
    }

    #[test]
    fn test_enhancement_options_deserialize_type_field() {
        let options: EnhancementOptions =
            serde_json::from_str(r#"{"type":"resolution","style":"bold"}"#).unwrap();
        assert_eq!(options.kind, EnhancementType::Resolution);
        assert_eq!(options.style, "bold");
        assert!(options.custom_instruction.is_none());
    }
}
