//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where generated artifacts are written
    pub artifact_dir: PathBuf,

    /// URL prefix under which artifacts are served for download
    pub download_prefix: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("~/.brandmark/artifacts"),
            download_prefix: "/api/logo/download".to_string(),
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum uploaded image size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum input image dimension (width or height)
    pub max_image_dimension: u32,

    /// Per-request timeout for remote backends in milliseconds
    pub remote_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            max_image_dimension: 4096,
            remote_timeout_ms: 120_000,
        }
    }
}

impl LimitsConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }
}

/// Remote image generation backend (Gemini image model).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API base URL
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Image-capable model name
    pub model: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: "${GEMINI_API_KEY}".to_string(),
            model: "gemini-2.5-flash-image-preview".to_string(),
        }
    }
}

/// Reasoning backend used to refine prompts and analyze businesses.
///
/// Speaks the OpenAI-compatible Chat Completions protocol (Groq by default).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// API base URL
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: "${GROQ_API_KEY}".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// Synthetic (vector) logo settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Square canvas edge in pixels
    pub canvas_size: u32,

    /// Gradient primary color when the request supplies none
    pub default_primary: String,

    /// Initials color when the request supplies fewer than two colors
    pub default_secondary: String,

    /// Percentage subtracted from each channel for the gradient end stop
    pub darken_percent: u8,

    /// Load system fonts for caption and initials rendering
    pub load_system_fonts: bool,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            canvas_size: 400,
            default_primary: "#2563eb".to_string(),
            default_secondary: "#ffffff".to_string(),
            darken_percent: 20,
            load_system_fonts: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
