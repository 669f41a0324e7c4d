//! Business name extraction and initials.

use once_cell::sync::Lazy;
use regex::Regex;

/// Used when the description has no words at all.
pub const PLACEHOLDER_NAME: &str = "Logo";

/// Tried in order; the first match wins. Matching is case-insensitive.
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)for\s+([A-Z][a-zA-Z\s]+)",
        r"(?i)([A-Z][a-zA-Z\s]+)\s+logo",
        r"(?i)logo\s+for\s+([A-Z][a-zA-Z\s]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("name pattern is valid"))
    .collect()
});

/// Pull a business name out of a free-text description.
///
/// Falls back to the first two words, then to [`PLACEHOLDER_NAME`].
pub fn extract_business_name(description: &str) -> String {
    for pattern in NAME_PATTERNS.iter() {
        if let Some(name) = pattern.captures(description).and_then(|c| c.get(1)) {
            let name = name.as_str().trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }

    let leading: Vec<&str> = description.split_whitespace().take(2).collect();
    if leading.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        leading.join(" ")
    }
}

/// Uppercased first letter of each word, at most two characters.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_pattern() {
        let name = extract_business_name("A modern logo for TechStart");
        assert_eq!(name, "TechStart");
        assert_eq!(initials(&name), "T");
    }

    #[test]
    fn test_first_two_words_fallback() {
        let name = extract_business_name("Blue Ocean consulting firm");
        assert_eq!(name, "Blue Ocean");
        assert_eq!(initials(&name), "BO");
    }

    #[test]
    fn test_name_logo_pattern() {
        assert_eq!(extract_business_name("Acme Corp logo, minimal"), "Acme Corp");
    }

    #[test]
    fn test_multi_word_name_stops_at_punctuation() {
        assert_eq!(
            extract_business_name("Design a badge for Green Leaf Cafe, earthy tones"),
            "Green Leaf Cafe"
        );
    }

    #[test]
    fn test_empty_description_uses_placeholder() {
        assert_eq!(extract_business_name(""), PLACEHOLDER_NAME);
        assert_eq!(extract_business_name("   "), PLACEHOLDER_NAME);
        assert_eq!(initials(PLACEHOLDER_NAME), "L");
    }

    #[test]
    fn test_single_word_description() {
        assert_eq!(extract_business_name("Zephyr"), "Zephyr");
    }

    #[test]
    fn test_initials_truncates_to_two() {
        assert_eq!(initials("green leaf cafe"), "GL");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_extraction_is_pure() {
        let description = "Premium branding for Northwind Traders";
        let first = extract_business_name(description);
        for _ in 0..10 {
            assert_eq!(extract_business_name(description), first);
            assert_eq!(initials(&extract_business_name(description)), initials(&first));
        }
    }
}
