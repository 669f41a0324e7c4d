//! Reference image analysis.
//!
//! Dominant colors come from a 4-bit-per-channel histogram of a downsampled
//! copy; transparent pixels are ignored. Undecodable input yields
//! [`ImageAnalysis::unknown`] rather than an error. Dimensions are read from
//! the header first, and images over the dimension limit are never decoded.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Cursor;

use crate::types::ImageDimensions;

const SAMPLE_EDGE: u32 = 64;
const DOMINANT_COLORS: usize = 3;

/// Summary of a reference image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Most common colors, most frequent first, as `#rrggbb`
    pub dominant_colors: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ImageDimensions>,

    pub file_size: u64,

    /// "horizontal", "vertical", "square", or "unknown"
    pub composition: String,

    /// "low", "medium", or "high"
    pub complexity: String,

    pub recommendations: Vec<String>,
}

impl ImageAnalysis {
    /// Analysis of bytes that could not be decoded.
    pub fn unknown(file_size: u64) -> Self {
        Self {
            dominant_colors: vec!["#000000".into(), "#ffffff".into()],
            format: None,
            dimensions: None,
            file_size,
            composition: "unknown".into(),
            complexity: "medium".into(),
            recommendations: vec!["Provide a PNG or JPEG reference for a detailed analysis".into()],
        }
    }
}

/// Analyze an encoded image no larger than `max_dimension` on either side.
/// Never fails.
pub fn analyze(bytes: &[u8], max_dimension: u32) -> ImageAnalysis {
    let file_size = bytes.len() as u64;
    let format = image::guess_format(bytes).ok();

    let header = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|reader| reader.into_dimensions());
    let (width, height) = match header {
        Ok(dimensions) => dimensions,
        Err(e) => {
            tracing::debug!("Reference analysis skipped: {e}");
            return ImageAnalysis::unknown(file_size);
        }
    };
    if width > max_dimension || height > max_dimension {
        tracing::debug!("Reference {width}x{height} exceeds {max_dimension}px; not decoding");
        return ImageAnalysis {
            format: format.map(format_name),
            dimensions: Some(ImageDimensions { width, height }),
            composition: composition(width, height).to_string(),
            recommendations: vec![format!(
                "Resize the reference to at most {max_dimension}px per side for a color analysis"
            )],
            ..ImageAnalysis::unknown(file_size)
        };
    }

    let decoded = match image::load_from_memory(bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Reference analysis skipped: {e}");
            return ImageAnalysis::unknown(file_size);
        }
    };

    let sample = if width > SAMPLE_EDGE || height > SAMPLE_EDGE {
        decoded
            .resize(SAMPLE_EDGE, SAMPLE_EDGE, FilterType::Triangle)
            .into_rgba8()
    } else {
        decoded.into_rgba8()
    };

    // bucket key -> (count, channel sums)
    let mut buckets: HashMap<u16, (u32, [u64; 3])> = HashMap::new();
    for pixel in sample.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < 128 {
            continue;
        }
        let key = ((r as u16 >> 4) << 8) | ((g as u16 >> 4) << 4) | (b as u16 >> 4);
        let entry = buckets.entry(key).or_insert((0, [0; 3]));
        entry.0 += 1;
        entry.1[0] += r as u64;
        entry.1[1] += g as u64;
        entry.1[2] += b as u64;
    }

    let mut ranked: Vec<(u16, u32, [u64; 3])> = buckets
        .into_iter()
        .map(|(key, (count, sums))| (key, count, sums))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let dominant_colors: Vec<String> = ranked
        .iter()
        .take(DOMINANT_COLORS)
        .map(|(_, count, sums)| {
            let mean = |sum: u64| (sum / *count as u64) as u8;
            format!("#{:02x}{:02x}{:02x}", mean(sums[0]), mean(sums[1]), mean(sums[2]))
        })
        .collect();

    let composition = composition(width, height);
    let complexity = complexity(ranked.len());
    let recommendations = recommendations(composition, complexity, dominant_colors.len());

    ImageAnalysis {
        dominant_colors,
        format: format.map(format_name),
        dimensions: Some(ImageDimensions { width, height }),
        file_size,
        composition: composition.to_string(),
        complexity: complexity.to_string(),
        recommendations,
    }
}

fn format_name(format: image::ImageFormat) -> String {
    format!("{format:?}").to_lowercase()
}

fn composition(width: u32, height: u32) -> &'static str {
    let ratio = width as f64 / height.max(1) as f64;
    if ratio > 1.25 {
        "horizontal"
    } else if ratio < 0.8 {
        "vertical"
    } else {
        "square"
    }
}

fn complexity(distinct_buckets: usize) -> &'static str {
    match distinct_buckets {
        0..=8 => "low",
        9..=48 => "medium",
        _ => "high",
    }
}

fn recommendations(composition: &str, complexity: &str, colors: usize) -> Vec<String> {
    let mut out = Vec::new();
    match complexity {
        "low" => out.push("Clean, minimal design that scales well".to_string()),
        "high" => out.push("Simplify details so the mark stays legible at small sizes".to_string()),
        _ => out.push("Balanced level of detail".to_string()),
    }
    if composition == "horizontal" {
        out.push("Consider a stacked or icon-only variant for square placements".to_string());
    }
    if colors <= 1 {
        out.push("Add an accent color for contrast".to_string());
    } else {
        out.push("Keep the existing palette for brand continuity".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    const LIMIT: u32 = 4096;

    fn png(image: RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_dominant_colors_ranked_by_area() {
        // Left three quarters blue, right quarter white
        let image = RgbaImage::from_fn(64, 32, |x, _| {
            if x < 48 {
                Rgba([0x25, 0x63, 0xeb, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let analysis = analyze(&png(image), LIMIT);
        assert_eq!(analysis.dominant_colors[0], "#2563eb");
        assert!(analysis.dominant_colors.contains(&"#ffffff".to_string()));
        assert_eq!(analysis.composition, "horizontal");
        assert_eq!(analysis.dimensions, Some(ImageDimensions { width: 64, height: 32 }));
        assert_eq!(analysis.format.as_deref(), Some("png"));
    }

    #[test]
    fn test_transparent_pixels_ignored() {
        let image = RgbaImage::from_fn(32, 32, |x, _| {
            if x < 4 {
                Rgba([200, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let analysis = analyze(&png(image), LIMIT);
        assert_eq!(analysis.dominant_colors.len(), 1);
        assert_eq!(analysis.complexity, "low");
        assert_eq!(analysis.composition, "square");
    }

    #[test]
    fn test_undecodable_input_is_unknown() {
        let analysis = analyze(b"not an image", LIMIT);
        assert_eq!(analysis, ImageAnalysis::unknown(12));
        assert_eq!(analysis.composition, "unknown");
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let image = RgbaImage::from_fn(50, 80, |x, y| Rgba([(x * 5) as u8, (y * 3) as u8, 90, 255]));
        let bytes = png(image);
        assert_eq!(analyze(&bytes, LIMIT), analyze(&bytes, LIMIT));
        assert_eq!(analyze(&bytes, LIMIT).composition, "vertical");
    }

    #[test]
    fn test_oversized_reference_is_not_decoded() {
        let image = RgbaImage::from_pixel(64, 32, Rgba([0x25, 0x63, 0xeb, 255]));
        let analysis = analyze(&png(image), 48);

        assert_eq!(analysis.dimensions, Some(ImageDimensions { width: 64, height: 32 }));
        assert_eq!(analysis.composition, "horizontal");
        assert_eq!(analysis.dominant_colors, ImageAnalysis::unknown(0).dominant_colors);
        assert!(analysis.recommendations[0].contains("48px"));
    }
}
