//! Prompt enhancer: builds enriched instructions for the remote tier.
//!
//! Every instruction starts as a clause template. When a reasoning backend
//! is configured it is asked to refine the template; any failure or unusable
//! reply returns the template unchanged. Callers never see reasoning errors.

pub mod business;
pub mod reasoning;
pub mod template;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ReasoningConfig;
use crate::types::{EnhancementOptions, ReferenceOptions, TextOptions};

pub use business::{BusinessAnalysis, BusinessProfile, CreativeDescription, Provenance};
pub use reasoning::{ChatCompletionsBackend, ReasoningBackend, Reply};

/// What an instruction is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Generation,
    Editing,
    Enhancement,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Generation => write!(f, "logo generation"),
            Purpose::Editing => write!(f, "logo editing"),
            Purpose::Enhancement => write!(f, "logo enhancement"),
        }
    }
}

/// An instruction and whether the reasoning backend refined it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub text: String,
    pub refined: bool,
}

impl Instruction {
    fn template(text: String) -> Self {
        Self {
            text,
            refined: false,
        }
    }
}

/// Builds instructions with an optional reasoning refinement step.
#[derive(Clone, Default)]
pub struct PromptEnhancer {
    reasoning: Option<Arc<dyn ReasoningBackend>>,
}

impl PromptEnhancer {
    pub fn new(reasoning: Option<Box<dyn ReasoningBackend>>) -> Self {
        Self {
            reasoning: reasoning.map(Arc::from),
        }
    }

    /// Template-only enhancer.
    pub fn templates_only() -> Self {
        Self::default()
    }

    /// Construct from config; an unconfigured backend leaves templates only.
    pub fn from_config(config: &ReasoningConfig, timeout: Duration) -> Self {
        match ChatCompletionsBackend::from_config(config, timeout) {
            Ok(backend) => {
                tracing::debug!("Reasoning backend enabled ({})", config.model);
                Self::new(Some(Box::new(backend)))
            }
            Err(e) => {
                tracing::warn!("Reasoning backend disabled: {e}");
                Self::templates_only()
            }
        }
    }

    pub fn is_reasoning_available(&self) -> bool {
        self.reasoning.is_some()
    }

    pub fn reasoning_model(&self) -> Option<&str> {
        self.reasoning.as_deref().map(|r| r.model())
    }

    /// Instruction for text-to-image generation.
    pub async fn generation(&self, description: &str, options: &TextOptions) -> Instruction {
        let text = template::generation(description, options);
        self.refine(Purpose::Generation, text, &options.style, &options.colors)
            .await
    }

    /// Instruction for editing a reference image.
    pub async fn editing(&self, options: &ReferenceOptions) -> Instruction {
        let text = template::editing(&template::reference_subject(options), options);
        self.refine(Purpose::Editing, text, &options.style, &[]).await
    }

    /// Instruction for enhancing an image as an edit.
    pub async fn enhancement(&self, options: &EnhancementOptions) -> Instruction {
        let text = template::enhancement(options);
        self.refine(Purpose::Enhancement, text, &options.style, &[])
            .await
    }

    /// Ask the reasoning backend to improve `text`; keep `text` on any failure.
    async fn refine(
        &self,
        purpose: Purpose,
        text: String,
        style: &str,
        colors: &[String],
    ) -> Instruction {
        let Some(backend) = &self.reasoning else {
            return Instruction::template(text);
        };

        let request = refinement_prompt(purpose, &text, style, colors);
        match backend.complete(&request).await {
            Ok(reply) => match refined_text(&Reply::parse(&reply)) {
                Some(refined) => Instruction {
                    text: refined,
                    refined: true,
                },
                None => {
                    tracing::warn!("Reasoning reply had no usable {purpose} instruction");
                    Instruction::template(text)
                }
            },
            Err(e) => {
                tracing::warn!("Reasoning refinement failed ({}): {e}", e.kind());
                Instruction::template(text)
            }
        }
    }

    /// Brand analysis; the fixed table when reasoning is unavailable.
    pub async fn analyze_business(&self, profile: &BusinessProfile) -> BusinessAnalysis {
        if let Some(backend) = &self.reasoning {
            match backend.complete(&business::analysis_prompt(profile)).await {
                Ok(reply) => {
                    if let Some(analysis) = BusinessAnalysis::from_reply(&Reply::parse(&reply)) {
                        return analysis;
                    }
                    tracing::warn!("Reasoning reply was not a usable business analysis");
                }
                Err(e) => tracing::warn!("Business analysis failed ({}): {e}", e.kind()),
            }
        }
        BusinessAnalysis::fallback(profile)
    }

    /// Creative description; a fixed template when reasoning is unavailable.
    pub async fn describe(
        &self,
        profile: &BusinessProfile,
        style_preferences: &[String],
        keywords: &[String],
    ) -> CreativeDescription {
        if let Some(backend) = &self.reasoning {
            let prompt = business::description_prompt(profile, style_preferences, keywords);
            match backend.complete(&prompt).await {
                Ok(reply) => {
                    if let Some(described) = CreativeDescription::from_reply(&Reply::parse(&reply))
                    {
                        return described;
                    }
                    tracing::warn!("Reasoning reply was not a usable description");
                }
                Err(e) => tracing::warn!("Creative description failed ({}): {e}", e.kind()),
            }
        }
        CreativeDescription::fallback(profile)
    }
}

fn refinement_prompt(purpose: Purpose, text: &str, style: &str, colors: &[String]) -> String {
    let colors = if colors.is_empty() {
        "professional colors".to_string()
    } else {
        colors.join(", ")
    };
    format!(
        "Enhance this {purpose} prompt for better AI image generation:\n\n\
         Original: \"{text}\"\n\n\
         Context:\n- Style: {style}\n- Colors: {colors}\n\n\
         Improve the prompt by adding specific visual details, technical specifications, \
         composition and layout, style and mood descriptors, and quality and format \
         requirements. Keep every requirement already present. Return only the enhanced \
         prompt, or a JSON object with an \"enhanced_prompt\" field."
    )
}

fn refined_text(reply: &Reply) -> Option<String> {
    let text = match reply {
        Reply::Text(text) => text.as_str(),
        Reply::Json(value) => value.get("enhanced_prompt")?.as_str()?,
    };
    let text = text.trim().trim_matches('"').trim();
    (!text.is_empty()).then(|| text.to_string())
}
