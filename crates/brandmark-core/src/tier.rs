//! Tier capability interface and the three tier implementations.
//!
//! The orchestrator holds an ordered list of `TierBackend`s and tries each
//! one that is available and supports the operation. Local tiers run their
//! CPU-bound work on the blocking pool.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::{TierError, TierResult};
use crate::prompt::template;
use crate::raster::{RasterEngine, RasterOutput};
use crate::remote::RemoteAdapter;
use crate::store::ArtifactStore;
use crate::synthetic::SyntheticGenerator;
use crate::types::{GenerationRequest, Generated, ImageDimensions, Metadata, Operation, Tier};

/// Artifact name prefixes for local tiers.
pub mod prefix {
    pub const ENHANCED: &str = "enhanced";
    pub const REFERENCE: &str = "reference-based";
    pub const SYNTHETIC: &str = "synthetic";
}

/// One backend able to serve some operations.
///
/// Uses `async_trait` so tiers can be held as `Box<dyn TierBackend>`.
#[async_trait]
pub trait TierBackend: Send + Sync {
    fn tier(&self) -> Tier;

    /// Whether the tier is configured and may be attempted.
    fn is_available(&self) -> bool {
        true
    }

    fn supports(&self, operation: Operation) -> bool;

    /// Model identifier, for tiers backed by a model.
    fn model(&self) -> Option<&str> {
        None
    }

    /// Produce and persist an artifact for `request`.
    ///
    /// `instruction` is the enriched instruction built for this request, if any.
    async fn attempt(
        &self,
        request: &GenerationRequest,
        instruction: Option<&str>,
    ) -> TierResult<Generated>;
}

/// Remote multimodal model.
pub struct RemoteTier {
    adapter: RemoteAdapter,
}

impl RemoteTier {
    pub fn new(adapter: RemoteAdapter) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl TierBackend for RemoteTier {
    fn tier(&self) -> Tier {
        Tier::Remote
    }

    fn supports(&self, _operation: Operation) -> bool {
        true
    }

    fn model(&self) -> Option<&str> {
        Some(self.adapter.model())
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
        instruction: Option<&str>,
    ) -> TierResult<Generated> {
        let instruction = match instruction {
            Some(text) => text.to_string(),
            None => default_instruction(request),
        };

        let output = match request {
            GenerationRequest::Text { .. } => self.adapter.text_to_image(&instruction).await?,
            GenerationRequest::Reference { image, .. } => {
                let bytes = read_input(image).await?;
                self.adapter.edit_image(&bytes, &instruction).await?
            }
            GenerationRequest::Enhance { image, .. } => {
                let bytes = read_input(image).await?;
                self.adapter.enhance_image(&bytes, &instruction).await?
            }
        };

        let mut metadata = Metadata::for_tier(Tier::Remote).with_request(request);
        metadata.model = Some(output.model);
        metadata.instruction = Some(instruction);
        Ok(Generated {
            artifact: output.artifact,
            metadata,
        })
    }
}

/// Deterministic pixel transforms.
pub struct RasterTier {
    engine: RasterEngine,
    store: ArtifactStore,
}

impl RasterTier {
    pub fn new(engine: RasterEngine, store: ArtifactStore) -> Self {
        Self { engine, store }
    }
}

#[async_trait]
impl TierBackend for RasterTier {
    fn tier(&self) -> Tier {
        Tier::Raster
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(operation, Operation::Enhance | Operation::GenerateReference)
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
        _instruction: Option<&str>,
    ) -> TierResult<Generated> {
        let engine = self.engine.clone();
        let (prefix, output) = match request {
            GenerationRequest::Enhance { image, options } => {
                let bytes = read_input(image).await?;
                let options = options.clone();
                let output = blocking(move || engine.enhance(&bytes, &options)).await?;
                (prefix::ENHANCED, output)
            }
            GenerationRequest::Reference { image, .. } => {
                let bytes = read_input(image).await?;
                let output = blocking(move || engine.similar(&bytes)).await?;
                (prefix::REFERENCE, output)
            }
            GenerationRequest::Text { .. } => {
                return Err(TierError::Processing(
                    "raster tier cannot generate from text".to_string(),
                ))
            }
        };

        let RasterOutput {
            png,
            source,
            output,
        } = output;
        let artifact = self.store.write(prefix, "png", png).await?;

        let mut metadata = Metadata::for_tier(Tier::Raster).with_request(request);
        metadata.source = Some(source);
        metadata.output = Some(output);
        Ok(Generated { artifact, metadata })
    }
}

/// Vector logo synthesis; never fails on text input.
pub struct SyntheticTier {
    generator: Arc<SyntheticGenerator>,
    store: ArtifactStore,
}

impl SyntheticTier {
    pub fn new(generator: SyntheticGenerator, store: ArtifactStore) -> Self {
        Self {
            generator: Arc::new(generator),
            store,
        }
    }
}

#[async_trait]
impl TierBackend for SyntheticTier {
    fn tier(&self) -> Tier {
        Tier::Synthetic
    }

    fn supports(&self, operation: Operation) -> bool {
        operation == Operation::GenerateText
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
        _instruction: Option<&str>,
    ) -> TierResult<Generated> {
        let GenerationRequest::Text {
            description,
            options,
        } = request
        else {
            return Err(TierError::Processing(
                "synthetic tier only generates from text".to_string(),
            ));
        };

        let generator = self.generator.clone();
        let (description_owned, options_owned) = (description.clone(), options.clone());
        let logo = blocking(move || generator.generate(&description_owned, &options_owned)).await?;
        let artifact = self.store.write(prefix::SYNTHETIC, "png", logo.png).await?;

        let mut metadata = Metadata::for_tier(Tier::Synthetic).with_request(request);
        metadata.business_name = Some(logo.layout.business_name);
        // Invalid or missing request colours fall back to defaults in `compose`.
        metadata.colors = vec![logo.layout.primary.to_hex(), logo.layout.initials_color.to_hex()];
        metadata.output = Some(ImageDimensions {
            width: logo.layout.size,
            height: logo.layout.size,
        });
        Ok(Generated { artifact, metadata })
    }
}

/// Template instruction for a request, used when none was supplied.
fn default_instruction(request: &GenerationRequest) -> String {
    match request {
        GenerationRequest::Text {
            description,
            options,
        } => template::generation(description, options),
        GenerationRequest::Reference { options, .. } => {
            template::editing(&template::reference_subject(options), options)
        }
        GenerationRequest::Enhance { options, .. } => template::enhancement(options),
    }
}

async fn read_input(path: &Path) -> TierResult<Vec<u8>> {
    Ok(tokio::fs::read(path).await?)
}

async fn blocking<T, F>(work: F) -> TierResult<T>
where
    F: FnOnce() -> TierResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| TierError::Processing(format!("worker task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LimitsConfig, SyntheticConfig};
    use crate::types::{EnhancementOptions, ReferenceOptions, TextOptions};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([40, 90, 200, 255])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn synthetic_config() -> SyntheticConfig {
        SyntheticConfig {
            load_system_fonts: false,
            ..SyntheticConfig::default()
        }
    }

    #[tokio::test]
    async fn test_raster_tier_enhances_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();
        let staged = store.stage(&png(40, 30)).await.unwrap();
        let tier = RasterTier::new(RasterEngine::new(LimitsConfig::default()), store.clone());

        let request = GenerationRequest::Enhance {
            image: staged.path().to_path_buf(),
            options: EnhancementOptions::default(),
        };
        let generated = tier.attempt(&request, None).await.unwrap();

        assert!(generated.artifact.filename.starts_with("enhanced-"));
        assert_eq!(generated.metadata.tier_used, Tier::Raster);
        assert_eq!(generated.metadata.source.unwrap().width, 40);
        assert!(generated.metadata.output.unwrap().width >= 1024);
        assert!(store.contains(&generated.artifact.filename));
    }

    #[tokio::test]
    async fn test_raster_tier_reference_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();
        let staged = store.stage(&png(20, 20)).await.unwrap();
        let tier = RasterTier::new(RasterEngine::new(LimitsConfig::default()), store);

        let request = GenerationRequest::Reference {
            image: staged.path().to_path_buf(),
            options: ReferenceOptions::default(),
        };
        let generated = tier.attempt(&request, None).await.unwrap();
        assert!(generated.artifact.filename.starts_with("reference-based-"));
        assert_eq!(generated.metadata.style.as_deref(), Some("similar"));
    }

    #[tokio::test]
    async fn test_raster_tier_corrupt_input_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();
        let staged = store.stage(b"garbage").await.unwrap();
        let tier = RasterTier::new(RasterEngine::new(LimitsConfig::default()), store);

        let request = GenerationRequest::Enhance {
            image: staged.path().to_path_buf(),
            options: EnhancementOptions::default(),
        };
        let err = tier.attempt(&request, None).await.unwrap_err();
        assert_eq!(err.kind(), "processing");
    }

    #[tokio::test]
    async fn test_synthetic_tier_records_name_and_colors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();
        let tier = SyntheticTier::new(SyntheticGenerator::new(synthetic_config()), store);

        let request = GenerationRequest::Text {
            description: "A modern logo for TechStart".into(),
            options: TextOptions::default(),
        };
        let generated = tier.attempt(&request, None).await.unwrap();
        assert!(generated.artifact.filename.starts_with("synthetic-"));
        assert!(generated.artifact.filename.ends_with(".png"));
        assert_eq!(generated.metadata.tier_used, Tier::Synthetic);
        assert_eq!(generated.metadata.business_name.as_deref(), Some("TechStart"));
        assert_eq!(generated.metadata.colors, vec!["#2563eb", "#ffffff"]);
        assert_eq!(
            generated.metadata.description.as_deref(),
            Some("A modern logo for TechStart")
        );
    }

    #[tokio::test]
    async fn test_synthetic_tier_records_rendered_colors_not_requested() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();
        let tier = SyntheticTier::new(SyntheticGenerator::new(synthetic_config()), store);

        let cases = [
            (vec!["sky blue".to_string()], vec!["#2563eb", "#ffffff"]),
            (vec!["#10b981".to_string()], vec!["#10b981", "#ffffff"]),
            (
                vec!["#10b981".to_string(), "charcoal".to_string()],
                vec!["#10b981", "#ffffff"],
            ),
        ];
        for (colors, expected) in cases {
            let request = GenerationRequest::Text {
                description: "Logo for Nimbus".into(),
                options: TextOptions {
                    colors: colors.clone(),
                    ..TextOptions::default()
                },
            };
            let generated = tier.attempt(&request, None).await.unwrap();
            assert_eq!(generated.metadata.colors, expected, "{colors:?}");
        }
    }

    #[tokio::test]
    async fn test_supports_matrix() {
        let tier_ops = |tier: &dyn TierBackend| {
            [
                Operation::Enhance,
                Operation::GenerateText,
                Operation::GenerateReference,
            ]
            .map(|op| tier.supports(op))
        };
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();
        let raster = RasterTier::new(RasterEngine::new(LimitsConfig::default()), store.clone());
        let synthetic = SyntheticTier::new(SyntheticGenerator::new(synthetic_config()), store);
        assert_eq!(tier_ops(&raster), [true, false, true]);
        assert_eq!(tier_ops(&synthetic), [false, true, false]);
    }

    #[test]
    fn test_default_instruction_per_request() {
        let request = GenerationRequest::Text {
            description: "Nimbus".into(),
            options: TextOptions::default(),
        };
        assert!(default_instruction(&request).starts_with("Create a professional logo: Nimbus."));
    }
}
