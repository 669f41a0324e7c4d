//! Synthetic vector logo generator.
//!
//! The last resort for text generation: extracts a business name from the
//! description, derives initials and a two-stop gradient, writes SVG markup,
//! and rasterizes it with `resvg`. No network access and no input image, so it
//! succeeds for any description.

pub mod color;
pub mod name;
pub mod svg;

use resvg::{tiny_skia, usvg};
use std::sync::Arc;

use crate::config::SyntheticConfig;
use crate::error::{TierError, TierResult};
use crate::types::TextOptions;

use color::Rgb;
use svg::LogoLayout;

/// Rasterized synthetic logo plus the values it was built from.
#[derive(Debug, Clone)]
pub struct SyntheticLogo {
    pub png: Vec<u8>,
    pub layout: LogoLayout,
}

/// Builds and rasterizes synthetic logos.
pub struct SyntheticGenerator {
    config: SyntheticConfig,
    fonts: Arc<usvg::fontdb::Database>,
}

impl SyntheticGenerator {
    /// Create a generator; loads system fonts once when enabled.
    pub fn new(config: SyntheticConfig) -> Self {
        let mut fonts = usvg::fontdb::Database::new();
        if config.load_system_fonts {
            fonts.load_system_fonts();
            if fonts.len() == 0 {
                tracing::warn!("No system fonts found; synthetic logos will render without text");
            } else {
                tracing::debug!("Synthetic tier loaded {} font faces", fonts.len());
            }
        }
        Self {
            config,
            fonts: Arc::new(fonts),
        }
    }

    /// Derive name, initials and colors for a description. Pure.
    pub fn compose(&self, description: &str, options: &TextOptions) -> LogoLayout {
        let business_name = name::extract_business_name(description);
        let initials = name::initials(&business_name);

        let primary = self.color_at(&options.colors, 0, &self.config.default_primary);
        let initials_color = self.color_at(&options.colors, 1, &self.config.default_secondary);
        let gradient_end = primary.darken(self.config.darken_percent);

        LogoLayout {
            business_name,
            initials,
            primary,
            gradient_end,
            initials_color,
            style: options.style.clone(),
            size: self.config.canvas_size,
        }
    }

    /// Compose, render markup, and rasterize to PNG.
    pub fn generate(&self, description: &str, options: &TextOptions) -> TierResult<SyntheticLogo> {
        let layout = self.compose(description, options);
        let markup = svg::render_markup(&layout);
        let png = self.rasterize(&markup)?;
        tracing::debug!(
            "Synthetic logo for {:?} ({}, {} -> {})",
            layout.business_name,
            layout.initials,
            layout.primary,
            layout.gradient_end
        );
        Ok(SyntheticLogo { png, layout })
    }

    /// Rasterize SVG markup into PNG bytes.
    pub fn rasterize(&self, markup: &str) -> TierResult<Vec<u8>> {
        let mut options = usvg::Options::default();
        options.fontdb = self.fonts.clone();

        let tree = usvg::Tree::from_str(markup, &options)
            .map_err(|e| TierError::Processing(format!("Invalid SVG markup: {e}")))?;
        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            TierError::Processing(format!(
                "Cannot allocate {}x{} canvas",
                size.width(),
                size.height()
            ))
        })?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| TierError::Processing(format!("PNG encode failed: {e}")))
    }

    /// Parsed color at `index`, or the configured default when absent or invalid.
    fn color_at(&self, colors: &[String], index: usize, default: &str) -> Rgb {
        colors
            .get(index)
            .and_then(|c| {
                let parsed = Rgb::parse(c);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unparseable color {c:?}");
                }
                parsed
            })
            .or_else(|| Rgb::parse(default))
            .unwrap_or(Rgb::new(0x25, 0x63, 0xeb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn generator() -> SyntheticGenerator {
        SyntheticGenerator::new(SyntheticConfig {
            load_system_fonts: false,
            ..SyntheticConfig::default()
        })
    }

    #[test]
    fn test_compose_uses_defaults_without_colors() {
        let layout = generator().compose("A modern logo for TechStart", &TextOptions::default());
        assert_eq!(layout.business_name, "TechStart");
        assert_eq!(layout.initials, "T");
        assert_eq!(layout.primary.to_hex(), "#2563eb");
        assert_eq!(layout.gradient_end.to_hex(), "#0030b8");
        assert_eq!(layout.initials_color.to_hex(), "#ffffff");
    }

    #[test]
    fn test_compose_uses_supplied_colors() {
        let options = TextOptions {
            colors: vec!["#10b981".into(), "#111827".into()],
            ..TextOptions::default()
        };
        let layout = generator().compose("Blue Ocean consulting firm", &options);
        assert_eq!(layout.initials, "BO");
        assert_eq!(layout.primary.to_hex(), "#10b981");
        assert_eq!(layout.initials_color.to_hex(), "#111827");
    }

    #[test]
    fn test_compose_ignores_invalid_primary() {
        let options = TextOptions {
            colors: vec!["sky blue".into()],
            ..TextOptions::default()
        };
        let layout = generator().compose("Logo for Nimbus", &options);
        assert_eq!(layout.primary.to_hex(), "#2563eb");
    }

    #[test]
    fn test_generate_produces_png_of_canvas_size() {
        let logo = generator()
            .generate("A modern logo for TechStart", &TextOptions::default())
            .unwrap();
        let decoded = image::load_from_memory(&logo.png).unwrap();
        assert_eq!(decoded.dimensions(), (400, 400));
        // Disc center carries the gradient, corners stay transparent
        let rgba = decoded.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0)[3], 0);
        assert_eq!(rgba.get_pixel(200, 170)[3], 255);
    }

    #[test]
    fn test_generate_handles_empty_and_hostile_descriptions() {
        let gen = generator();
        for description in ["", "   ", "<script>&\"'", "🚀🚀 rocket"] {
            let logo = gen.generate(description, &TextOptions::default()).unwrap();
            assert!(!logo.png.is_empty(), "{description:?}");
        }
    }

    #[tokio::test]
    async fn test_generator_built_on_blocking_pool_renders_without_fonts() {
        let gen = tokio::task::spawn_blocking(generator).await.unwrap();
        assert_eq!(gen.fonts.len(), 0);

        // Text is dropped but the gradient disc still renders
        let logo = gen.generate("Logo for Nimbus", &TextOptions::default()).unwrap();
        let rgba = image::load_from_memory(&logo.png).unwrap().to_rgba8();
        assert_eq!(rgba.get_pixel(200, 60)[3], 255);
    }
}
