//! Clause templates for generation, reference-editing and enhancement
//! instructions.

use crate::types::{EnhancementOptions, EnhancementType, ReferenceOptions, TextOptions};

const GENERATION_REQUIREMENTS: &str = "Requirements: vector-style design, high contrast, \
readable at small sizes, professional appearance, suitable for branding, clean background, \
sharp edges, balanced composition, memorable and distinctive. Output should be suitable for \
use as a company logo on websites, business cards, and marketing materials.";

const EDITING_REQUIREMENTS: &str = "Maintain professional logo quality, ensure text is \
readable, keep the design scalable and suitable for branding purposes.";

const ENHANCEMENT_REQUIREMENTS: &str = "Maintain the logo's professional appearance, ensure \
all text remains readable, preserve the original composition and branding elements, output \
should be suitable for professional use.";

/// Reference style that keeps the original look.
pub const KEEP_STYLE: &str = "similar";

/// Instruction for text-to-image generation.
///
/// Color and business clauses appear only when supplied.
pub fn generation(description: &str, options: &TextOptions) -> String {
    let mut clauses = vec![
        format!("Create a professional logo: {}.", description.trim()),
        format!("Style: {}, clean and scalable design.", options.style),
    ];

    let colors: Vec<&str> = non_blank(&options.colors).collect();
    if !colors.is_empty() {
        clauses.push(format!("Use colors: {}.", colors.join(", ")));
    }
    if let Some(business_type) = non_blank_opt(&options.business_type) {
        clauses.push(format!("This is for a {business_type} business."));
    }

    clauses.push(GENERATION_REQUIREMENTS.to_string());
    clauses.join(" ")
}

/// Base subject used when a reference is edited without a description.
pub fn reference_subject(options: &ReferenceOptions) -> String {
    format!(
        "Create a logo similar to this reference image for {}",
        non_blank_opt(&options.business_name).unwrap_or("the business")
    )
}

/// Instruction for editing a reference image.
pub fn editing(subject: &str, options: &ReferenceOptions) -> String {
    let mut clauses = vec![format!("Edit this logo image: {}.", subject.trim())];

    if let Some(name) = non_blank_opt(&options.business_name) {
        clauses.push(format!("The business name is \"{name}\"."));
    }
    if options.style.trim().is_empty() || options.style.eq_ignore_ascii_case(KEEP_STYLE) {
        clauses.push("Keep the overall style and composition similar to the original.".into());
    } else {
        clauses.push(format!("Apply a {} style to the design.", options.style));
    }

    let modifications: Vec<&str> = non_blank(&options.modifications).collect();
    if !modifications.is_empty() {
        clauses.push(format!(
            "Make these modifications: {}.",
            modifications.join(", ")
        ));
    }

    clauses.push(EDITING_REQUIREMENTS.to_string());
    clauses.join(" ")
}

/// Instruction for enhancing an image as an edit.
pub fn enhancement(options: &EnhancementOptions) -> String {
    let directive = match options.kind {
        EnhancementType::Quality => "Improve the image quality, increase sharpness and clarity, \
             enhance colors and contrast, remove any artifacts or noise."
            .to_string(),
        EnhancementType::Style => format!(
            "Apply a {} style transformation, update the visual appearance while \
             maintaining the core design elements.",
            options.style
        ),
        EnhancementType::Resolution => "Increase the resolution and detail of the image, \
             make it crisp and suitable for high-resolution displays."
            .to_string(),
    };

    let mut clauses = vec![format!("Enhance this logo image: {directive}")];
    if let Some(custom) = non_blank_opt(&options.custom_instruction) {
        clauses.push(format!("Additional instructions: {custom}."));
    }
    clauses.push(ENHANCEMENT_REQUIREMENTS.to_string());
    clauses.join(" ")
}

fn non_blank(values: &[String]) -> impl Iterator<Item = &str> {
    values.iter().map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn non_blank_opt(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
