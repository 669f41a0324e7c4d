//! Raster processing engine: deterministic enhancement without any network.
//!
//! Operations work on decoded RGBA8 buffers and always encode to PNG:
//! - **quality**: Lanczos upscale (larger edge >= 1024, at least 2x), sharpen, normalize
//! - **style**: per-style brightness/saturation modulation plus sharpen or tint
//! - **resolution**: 4x when the narrower edge is under 512px, else 2x, then sharpen
//! - **similar**: fit inside 1024x1024 over white, mild boost, sharpen

pub mod adjust;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::{TierError, TierResult};
use crate::types::{EnhancementOptions, EnhancementType, ImageDimensions};

const QUALITY_TARGET_EDGE: u32 = 1024;
const SIMILAR_BOX: u32 = 1024;
const RESOLUTION_SMALL_EDGE: u32 = 512;
const VINTAGE_TINT: [u8; 3] = [255, 240, 200];

/// Unsharp-mask strengths as (sigma, threshold).
const SHARPEN_MILD: (f32, i32) = (0.8, 1);
const SHARPEN_MODERATE: (f32, i32) = (1.0, 1);
const SHARPEN_STRONG: (f32, i32) = (2.0, 0);

/// Encoded result of a raster operation.
#[derive(Debug, Clone)]
pub struct RasterOutput {
    /// PNG bytes
    pub png: Vec<u8>,
    pub source: ImageDimensions,
    pub output: ImageDimensions,
}

/// Deterministic image transforms with input limits.
#[derive(Debug, Clone)]
pub struct RasterEngine {
    limits: LimitsConfig,
}

impl RasterEngine {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode and enhance an image according to `options`.
    pub fn enhance(&self, bytes: &[u8], options: &EnhancementOptions) -> TierResult<RasterOutput> {
        let image = self.decode(bytes)?;
        let source = dimensions(&image);
        let enhanced = match options.kind {
            EnhancementType::Quality => enhance_quality(&image),
            EnhancementType::Style => enhance_style(&image, &options.style),
            EnhancementType::Resolution => enhance_resolution(&image),
        };
        tracing::debug!(
            "Raster {} ({}): {}x{} -> {}x{}",
            options.kind,
            options.style,
            source.width,
            source.height,
            enhanced.width(),
            enhanced.height()
        );
        encode(source, &enhanced)
    }

    /// Produce a variant of a reference logo.
    pub fn similar(&self, bytes: &[u8]) -> TierResult<RasterOutput> {
        let image = self.decode(bytes)?;
        let source = dimensions(&image);
        let result = similar_logo(&image);
        encode(source, &result)
    }

    /// Decode with content-based format detection and dimension limits.
    pub fn decode(&self, bytes: &[u8]) -> TierResult<DynamicImage> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| TierError::Processing(format!("Cannot detect image format: {e}")))?;
        if reader.format().is_none() {
            return Err(TierError::Processing("Unsupported image format".to_string()));
        }
        let image = reader
            .decode()
            .map_err(|e| TierError::Processing(format!("Decode failed: {e}")))?;

        let (width, height) = image.dimensions();
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(TierError::Processing(format!(
                "Image too large: {width}x{height} > {max_dim}"
            )));
        }
        Ok(image)
    }
}

/// Upscale so the larger edge reaches 1024px (never less than 2x), sharpen, normalize.
pub fn enhance_quality(image: &DynamicImage) -> DynamicImage {
    let (width, height) = quality_target(image.width(), image.height());
    let resized = image.resize_exact(width, height, FilterType::Lanczos3);
    let mut buffer = sharpen(&resized, SHARPEN_MILD).into_rgba8();
    adjust::normalize(&mut buffer);
    DynamicImage::ImageRgba8(buffer)
}

/// Apply a named style; unknown names only normalize.
pub fn enhance_style(image: &DynamicImage, style: &str) -> DynamicImage {
    let mut buffer = image.to_rgba8();
    match style.trim().to_lowercase().as_str() {
        "modern" => {
            adjust::modulate(&mut buffer, 1.1, 1.2);
            sharpen(&DynamicImage::ImageRgba8(buffer), SHARPEN_MODERATE)
        }
        "vintage" => {
            adjust::modulate(&mut buffer, 0.9, 0.8);
            adjust::tint(&mut buffer, VINTAGE_TINT);
            DynamicImage::ImageRgba8(buffer)
        }
        "bold" => {
            adjust::modulate(&mut buffer, 1.2, 1.5);
            sharpen(&DynamicImage::ImageRgba8(buffer), SHARPEN_STRONG)
        }
        _ => {
            adjust::normalize(&mut buffer);
            DynamicImage::ImageRgba8(buffer)
        }
    }
}

/// 4x when the narrower edge is under 512px, otherwise 2x; then sharpen.
pub fn enhance_resolution(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let factor = resolution_factor(width, height);
    let resized = image.resize_exact(width * factor, height * factor, FilterType::Lanczos3);
    sharpen(&resized, SHARPEN_MILD)
}

/// Fit inside 1024x1024 on white, boost brightness and saturation slightly, sharpen.
pub fn similar_logo(image: &DynamicImage) -> DynamicImage {
    let mut buffer = image
        .resize(SIMILAR_BOX, SIMILAR_BOX, FilterType::Lanczos3)
        .into_rgba8();
    adjust::flatten_on_white(&mut buffer);
    adjust::modulate(&mut buffer, 1.1, 1.1);
    sharpen(&DynamicImage::ImageRgba8(buffer), SHARPEN_MILD)
}

/// Output size for the quality operation.
pub fn quality_target(width: u32, height: u32) -> (u32, u32) {
    let larger = width.max(height).max(1);
    if larger * 2 >= QUALITY_TARGET_EDGE {
        return (width * 2, height * 2);
    }
    // Scale the larger edge to exactly 1024 and round the other edge up
    let scale = |edge: u32| {
        let scaled = (edge as u64 * QUALITY_TARGET_EDGE as u64).div_ceil(larger as u64);
        scaled as u32
    };
    (scale(width), scale(height))
}

pub fn resolution_factor(width: u32, height: u32) -> u32 {
    if width.min(height) < RESOLUTION_SMALL_EDGE {
        4
    } else {
        2
    }
}

fn sharpen(image: &DynamicImage, (sigma, threshold): (f32, i32)) -> DynamicImage {
    image.unsharpen(sigma, threshold)
}

fn dimensions(image: &DynamicImage) -> ImageDimensions {
    let (width, height) = image.dimensions();
    ImageDimensions { width, height }
}

fn encode(source: ImageDimensions, image: &DynamicImage) -> TierResult<RasterOutput> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| TierError::Processing(format!("PNG encode failed: {e}")))?;
    Ok(RasterOutput {
        png,
        source,
        output: dimensions(image),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    fn engine() -> RasterEngine {
        RasterEngine::new(LimitsConfig::default())
    }

    #[test]
    fn test_quality_target_small_image() {
        assert_eq!(quality_target(400, 300), (1024, 768));
        assert_eq!(quality_target(100, 100), (1024, 1024));
        assert_eq!(quality_target(300, 400), (768, 1024));
    }

    #[test]
    fn test_quality_target_large_image_doubles() {
        assert_eq!(quality_target(800, 600), (1600, 1200));
        assert_eq!(quality_target(512, 10), (1024, 20));
    }

    #[test]
    fn test_quality_400x300_meets_size_guarantees() {
        let bytes = png_bytes(&gradient(400, 300));
        let output = engine()
            .enhance(&bytes, &EnhancementOptions::default())
            .unwrap();
        assert_eq!(output.source, ImageDimensions { width: 400, height: 300 });
        assert!(output.output.width.max(output.output.height) >= 1024);
        assert!(output.output.width >= 800);
        assert!(output.output.height >= 600);

        let decoded = image::load_from_memory(&output.png).unwrap();
        assert_eq!(decoded.dimensions(), (output.output.width, output.output.height));
    }

    #[test]
    fn test_resolution_factor() {
        assert_eq!(resolution_factor(300, 200), 4);
        assert_eq!(resolution_factor(600, 511), 4);
        assert_eq!(resolution_factor(600, 800), 2);
    }

    #[test]
    fn test_resolution_output_dimensions() {
        let out = enhance_resolution(&gradient(30, 20));
        assert_eq!(out.dimensions(), (120, 80));
    }

    #[test]
    fn test_style_modern_brightens() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([100, 100, 100, 255])));
        let out = enhance_style(&img, "modern").to_rgba8();
        assert!(out.get_pixel(4, 4)[0] > 100);
    }

    #[test]
    fn test_style_vintage_is_warmer() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([200, 200, 200, 255])));
        let out = enhance_style(&img, "vintage").to_rgba8();
        let Rgba([r, _, b, _]) = *out.get_pixel(0, 0);
        assert!(r > b);
        assert!(r < 200);
    }

    #[test]
    fn test_style_unknown_only_normalizes() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([120, 60, 30, 255])));
        let out = enhance_style(&img, "retro-futurism");
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(out.to_rgba8().get_pixel(0, 0), &Rgba([120, 60, 30, 255]));
    }

    #[test]
    fn test_similar_fits_box_and_is_opaque() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 0])));
        let out = similar_logo(&img);
        assert_eq!(out.dimensions(), (1024, 512));
        let rgba = out.to_rgba8();
        assert!(rgba.pixels().all(|p| p[3] == 255));
        assert_eq!(rgba.get_pixel(500, 250)[0], 255);
    }

    #[test]
    fn test_enhance_is_deterministic() {
        let bytes = png_bytes(&gradient(64, 48));
        let options = EnhancementOptions {
            kind: EnhancementType::Style,
            style: "bold".into(),
            custom_instruction: None,
        };
        let a = engine().enhance(&bytes, &options).unwrap();
        let b = engine().enhance(&bytes, &options).unwrap();
        assert_eq!(a.png, b.png);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = engine().decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TierError::Processing(_)));
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let limits = LimitsConfig {
            max_image_dimension: 32,
            ..LimitsConfig::default()
        };
        let bytes = png_bytes(&gradient(64, 16));
        let err = RasterEngine::new(limits).decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
