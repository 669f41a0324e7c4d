//! Business analysis and creative descriptions for pre-generation planning.
//!
//! Both ask the reasoning backend for JSON and fall back to fixed tables
//! when it is absent, fails, or returns something unusable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::reasoning::Reply;

/// Business details supplied by the caller. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub name: String,
    pub business_type: String,
    pub description: Option<String>,
    pub target_audience: Option<String>,
}

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Reasoning,
    Fallback,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub style: String,
    pub weight: String,
}

/// Design insights for a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessAnalysis {
    pub brand_personality: Vec<String>,
    pub color_schemes: Vec<Vec<String>>,
    pub style_suggestions: Vec<String>,
    pub symbol_recommendations: Vec<String>,
    pub typography: Typography,
    pub confidence_score: f32,
    pub provenance: Provenance,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AnalysisReply {
    brand_personality: Vec<String>,
    color_schemes: Vec<Vec<String>>,
    style_suggestions: Vec<String>,
    symbol_recommendations: Vec<String>,
    typography: Typography,
}

const REASONING_CONFIDENCE: f32 = 0.85;
const FALLBACK_CONFIDENCE: f32 = 0.6;

impl BusinessAnalysis {
    /// Interpret a reasoning reply; `None` when it is not usable JSON.
    pub fn from_reply(reply: &Reply) -> Option<Self> {
        let Reply::Json(value) = reply else {
            return None;
        };
        let parsed: AnalysisReply = serde_json::from_value(value.clone()).ok()?;
        if parsed.brand_personality.is_empty() && parsed.style_suggestions.is_empty() {
            return None;
        }
        Some(Self {
            brand_personality: parsed.brand_personality,
            color_schemes: parsed.color_schemes,
            style_suggestions: parsed.style_suggestions,
            symbol_recommendations: parsed.symbol_recommendations,
            typography: parsed.typography,
            confidence_score: REASONING_CONFIDENCE,
            provenance: Provenance::Reasoning,
        })
    }

    /// Fixed table keyed on business type.
    pub fn fallback(profile: &BusinessProfile) -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        match profile.business_type.trim().to_lowercase().as_str() {
            "tech" => Self {
                brand_personality: strings(&["innovative", "modern", "reliable", "cutting-edge"]),
                color_schemes: vec![
                    strings(&["#2563eb", "#ffffff", "#1f2937"]),
                    strings(&["#7c3aed", "#ffffff", "#374151"]),
                ],
                style_suggestions: strings(&["modern", "minimalist", "geometric"]),
                symbol_recommendations: strings(&[
                    "abstract shapes",
                    "circuit patterns",
                    "arrows",
                ]),
                typography: Typography {
                    style: "sans-serif".into(),
                    weight: "medium".into(),
                },
                confidence_score: FALLBACK_CONFIDENCE,
                provenance: Provenance::Fallback,
            },
            _ => Self {
                brand_personality: strings(&[
                    "professional",
                    "trustworthy",
                    "reliable",
                    "approachable",
                ]),
                color_schemes: vec![
                    strings(&["#1f2937", "#ffffff", "#3b82f6"]),
                    strings(&["#059669", "#ffffff", "#1f2937"]),
                ],
                style_suggestions: strings(&["professional", "clean", "balanced"]),
                symbol_recommendations: strings(&[
                    "geometric shapes",
                    "abstract symbols",
                    "typography-based",
                ]),
                typography: Typography {
                    style: "sans-serif".into(),
                    weight: "regular".into(),
                },
                confidence_score: FALLBACK_CONFIDENCE,
                provenance: Provenance::Fallback,
            },
        }
    }
}

/// A detailed logo description suitable as a generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeDescription {
    pub main_description: String,
    pub variations: Vec<String>,
    pub technical_specs: BTreeMap<String, serde_json::Value>,
    pub mood_board: Vec<String>,
    pub provenance: Provenance,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DescriptionReply {
    main_description: String,
    variations: Vec<String>,
    technical_specs: BTreeMap<String, serde_json::Value>,
    mood_board: Vec<String>,
}

impl CreativeDescription {
    /// Interpret a reasoning reply. Plain text becomes the main description.
    pub fn from_reply(reply: &Reply) -> Option<Self> {
        let parsed = match reply {
            Reply::Json(value) => serde_json::from_value::<DescriptionReply>(value.clone()).ok()?,
            Reply::Text(text) => DescriptionReply {
                main_description: text.clone(),
                ..DescriptionReply::default()
            },
        };
        if parsed.main_description.trim().is_empty() {
            return None;
        }
        Some(Self {
            main_description: parsed.main_description,
            variations: parsed.variations,
            technical_specs: parsed.technical_specs,
            mood_board: parsed.mood_board,
            provenance: Provenance::Reasoning,
        })
    }

    pub fn fallback(profile: &BusinessProfile) -> Self {
        let technical_specs = [
            ("format", "vector-based"),
            ("colors", "RGB and CMYK ready"),
            ("scalability", "infinite"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
        .collect();

        Self {
            main_description: format!(
                "A modern, professional logo for {}, featuring clean typography and a \
                 sophisticated color palette that reflects the {} industry. The design should \
                 be versatile, scalable, and memorable.",
                profile.name, profile.business_type
            ),
            variations: vec![
                "Horizontal layout version".into(),
                "Stacked vertical version".into(),
                "Icon-only version".into(),
            ],
            technical_specs,
            mood_board: Vec::new(),
            provenance: Provenance::Fallback,
        }
    }
}

/// Prompt asking for a JSON business analysis.
pub fn analysis_prompt(profile: &BusinessProfile) -> String {
    format!(
        "Analyze the following business information and provide insights for logo design:\n\n\
         Business Name: {}\n\
         Business Type: {}\n\
         Description: {}\n\
         Target Audience: {}\n\n\
         Respond with a JSON object with these keys: brand_personality (list of traits), \
         color_schemes (list of lists of hex colors), style_suggestions (list), \
         symbol_recommendations (list), typography (object with style and weight).",
        profile.name,
        profile.business_type,
        profile.description.as_deref().unwrap_or("Not provided"),
        profile.target_audience.as_deref().unwrap_or("General"),
    )
}

/// Prompt asking for a creative logo description.
pub fn description_prompt(
    profile: &BusinessProfile,
    style_preferences: &[String],
    keywords: &[String],
) -> String {
    let joined = |items: &[String], default: &str| {
        if items.is_empty() {
            default.to_string()
        } else {
            items.join(", ")
        }
    };
    format!(
        "Create a detailed, creative description for a logo design based on:\n\n\
         Business: {} ({})\n\
         Style Preferences: {}\n\
         Keywords: {}\n\n\
         Cover visual elements and composition, a color palette with specific colors, \
         typography style, overall mood, and technical specifications. Make it detailed \
         enough for AI image generation. Respond with a JSON object with keys \
         main_description, variations, technical_specs and mood_board.",
        profile.name,
        profile.business_type,
        joined(style_preferences, "Modern, Professional"),
        joined(keywords, "Innovation, Trust, Quality"),
    )
}
