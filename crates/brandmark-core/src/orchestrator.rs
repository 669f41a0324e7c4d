//! Orchestrator: the public operations and the tier fallback chain.
//!
//! Tier order is fixed at construction: remote (only when configured), then
//! raster, then synthetic. Each request walks the tiers that are available and
//! support its operation, strictly in order. A failing tier is logged and
//! skipped; only the last failure reaches the caller, wrapped with the
//! operation it belongs to. There are no retries within a tier.
//!
//! Uploaded images are staged to disk for the duration of one call and
//! removed on every exit path by the [`StagedInput`](crate::store::StagedInput)
//! guard.

use serde::Serialize;

use crate::analysis::{self, ImageAnalysis};
use crate::config::{Config, LimitsConfig};
use crate::error::{BrandmarkError, Result, TierError};
use crate::prompt::{
    BusinessAnalysis, BusinessProfile, CreativeDescription, Instruction, PromptEnhancer,
};
use crate::raster::RasterEngine;
use crate::remote::{self, RemoteAdapter};
use crate::store::ArtifactStore;
use crate::synthetic::SyntheticGenerator;
use crate::tier::{RasterTier, RemoteTier, SyntheticTier, TierBackend};
use crate::types::{
    EnhancementOptions, GenerationRequest, Generated, Operation, Outcome, ReferenceOptions,
    TextOptions, Tier,
};

/// Availability of a model-backed component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    /// Remote image generation is configured
    pub image_generation: bool,
    /// Prompt refinement through the reasoning backend
    pub text_analysis: bool,
    /// Always true; falls back to fixed tables
    pub business_analysis: bool,
}

/// Snapshot of what the service can currently do.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub version: String,
    pub remote: ComponentStatus,
    pub reasoning: ComponentStatus,
    /// Configured tiers in fallback order
    pub tiers: Vec<Tier>,
    pub capabilities: Capabilities,
}

/// Coordinates tiers, staging, and prompt building.
pub struct Orchestrator {
    tiers: Vec<Box<dyn TierBackend>>,
    enhancer: PromptEnhancer,
    store: ArtifactStore,
    limits: LimitsConfig,
    download_prefix: String,
}

impl Orchestrator {
    /// Build the standard tier chain from configuration.
    ///
    /// Missing credentials disable the remote tier (and prompt refinement)
    /// with a warning; they never fail construction.
    pub async fn new(config: &Config) -> Result<Self> {
        let store = ArtifactStore::open(config.artifact_dir()).await?;
        let timeout = config.limits.remote_timeout();
        let enhancer = PromptEnhancer::from_config(&config.reasoning, timeout);

        let mut tiers: Vec<Box<dyn TierBackend>> = Vec::with_capacity(3);
        match remote::backend_from_config(&config.remote, timeout) {
            Ok(backend) => {
                tracing::info!("Remote tier enabled ({})", backend.model());
                tiers.push(Box::new(RemoteTier::new(RemoteAdapter::new(
                    backend,
                    store.clone(),
                ))));
            }
            Err(e) => tracing::warn!("Remote tier disabled: {e}"),
        }
        tiers.push(Box::new(RasterTier::new(
            RasterEngine::new(config.limits.clone()),
            store.clone(),
        )));
        // Font discovery walks system directories.
        let synthetic_config = config.synthetic.clone();
        let generator =
            tokio::task::spawn_blocking(move || SyntheticGenerator::new(synthetic_config))
                .await
                .map_err(|e| BrandmarkError::Io(std::io::Error::other(e)))?;
        tiers.push(Box::new(SyntheticTier::new(generator, store.clone())));

        Ok(Self::from_parts(store, config.limits.clone(), enhancer, tiers)
            .with_download_prefix(&config.general.download_prefix))
    }

    /// Assemble from explicit parts; `tiers` is the fallback order.
    pub fn from_parts(
        store: ArtifactStore,
        limits: LimitsConfig,
        enhancer: PromptEnhancer,
        tiers: Vec<Box<dyn TierBackend>>,
    ) -> Self {
        Self {
            tiers,
            enhancer,
            store,
            limits,
            download_prefix: crate::config::GeneralConfig::default().download_prefix,
        }
    }

    pub fn with_download_prefix(mut self, prefix: &str) -> Self {
        self.download_prefix = prefix.to_string();
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn download_prefix(&self) -> &str {
        &self.download_prefix
    }

    /// Enhance an existing image: remote edit, then raster transforms.
    pub async fn enhance(&self, image: &[u8], options: EnhancementOptions) -> Result<Outcome> {
        self.check_image(image)?;
        let staged = self.store.stage(image).await?;

        let instruction = if self.remote_in_chain(Operation::Enhance) {
            Some(self.enhancer.enhancement(&options).await.text)
        } else {
            None
        };
        let request = GenerationRequest::Enhance {
            image: staged.path().to_path_buf(),
            options,
        };

        let generated = self.run(&request, instruction.as_deref()).await?;
        Ok(Outcome::from_generated(generated))
    }

    /// Generate a logo from a description: remote, then synthetic.
    ///
    /// Succeeds for every non-blank description.
    pub async fn generate_from_text(
        &self,
        description: &str,
        options: TextOptions,
    ) -> Result<Outcome> {
        let description = description.trim();
        if description.is_empty() {
            return Err(BrandmarkError::InvalidRequest(
                "description must not be empty".to_string(),
            ));
        }

        let instruction = self.enhancer.generation(description, &options).await;
        let request = GenerationRequest::Text {
            description: description.to_string(),
            options,
        };

        let generated = self.run(&request, Some(&instruction.text)).await?;
        let mut outcome = Outcome::from_generated(generated);
        outcome.prompt = Some(instruction.text);
        Ok(outcome)
    }

    /// Create a logo from a reference image: remote edit, then raster variant.
    ///
    /// The response carries an analysis of the reference.
    pub async fn generate_from_reference(
        &self,
        image: &[u8],
        options: ReferenceOptions,
    ) -> Result<Outcome> {
        self.check_image(image)?;
        let staged = self.store.stage(image).await?;

        let bytes = image.to_vec();
        let max_dimension = self.limits.max_image_dimension;
        let analysis =
            tokio::task::spawn_blocking(move || analysis::analyze(&bytes, max_dimension))
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("Reference analysis task failed: {e}");
                    ImageAnalysis::unknown(image.len() as u64)
                });

        let instruction = if self.remote_in_chain(Operation::GenerateReference) {
            Some(self.enhancer.editing(&options).await.text)
        } else {
            None
        };
        let request = GenerationRequest::Reference {
            image: staged.path().to_path_buf(),
            options,
        };

        let generated = self.run(&request, instruction.as_deref()).await?;
        let mut outcome = Outcome::from_generated(generated);
        outcome.analysis = Some(analysis);
        Ok(outcome)
    }

    /// Read an artifact back exactly as written.
    pub async fn download(&self, filename: &str) -> Result<Vec<u8>> {
        self.store.read(filename).await
    }

    pub fn status(&self) -> ServiceStatus {
        let remote = self
            .tiers
            .iter()
            .find(|t| t.tier() == Tier::Remote && t.is_available());
        let remote = ComponentStatus {
            available: remote.is_some(),
            model: remote.and_then(|t| t.model()).map(String::from),
        };
        let reasoning = ComponentStatus {
            available: self.enhancer.is_reasoning_available(),
            model: self.enhancer.reasoning_model().map(String::from),
        };
        let capabilities = Capabilities {
            image_generation: remote.available,
            text_analysis: reasoning.available,
            business_analysis: true,
        };

        ServiceStatus {
            version: crate::VERSION.to_string(),
            tiers: self.tiers.iter().map(|t| t.tier()).collect(),
            remote,
            reasoning,
            capabilities,
        }
    }

    /// Design insights for a business.
    pub async fn analyze_business(&self, profile: &BusinessProfile) -> Result<BusinessAnalysis> {
        check_profile(profile)?;
        Ok(self.enhancer.analyze_business(profile).await)
    }

    /// Detailed creative description for a business's logo.
    pub async fn describe(
        &self,
        profile: &BusinessProfile,
        style_preferences: &[String],
        keywords: &[String],
    ) -> Result<CreativeDescription> {
        check_profile(profile)?;
        Ok(self
            .enhancer
            .describe(profile, style_preferences, keywords)
            .await)
    }

    /// The generation instruction that would be sent for a description.
    pub async fn enhance_prompt(
        &self,
        description: &str,
        options: &TextOptions,
    ) -> Result<Instruction> {
        let description = description.trim();
        if description.is_empty() {
            return Err(BrandmarkError::InvalidRequest(
                "description must not be empty".to_string(),
            ));
        }
        Ok(self.enhancer.generation(description, options).await)
    }

    /// Walk the tier chain for `request`.
    async fn run(
        &self,
        request: &GenerationRequest,
        instruction: Option<&str>,
    ) -> Result<Generated> {
        let operation = request.operation();
        let candidates: Vec<&dyn TierBackend> = self
            .tiers
            .iter()
            .map(|t| &**t)
            .filter(|t| t.is_available() && t.supports(operation))
            .collect();

        let mut last_error = None;
        for (index, tier) in candidates.iter().enumerate() {
            match tier.attempt(request, instruction).await {
                Ok(generated) => {
                    tracing::info!(
                        "{} tier served {operation}: {}",
                        tier.tier(),
                        generated.artifact.filename
                    );
                    return Ok(generated);
                }
                Err(e) => {
                    if index + 1 < candidates.len() {
                        tracing::warn!(
                            "{} tier failed to {operation} ({}), falling back: {e}",
                            tier.tier(),
                            e.kind()
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        let source = last_error.unwrap_or_else(|| TierError::Configuration {
            backend: "orchestrator".to_string(),
            message: format!("no tier can {operation}"),
        });
        Err(BrandmarkError::Operation { operation, source })
    }

    fn remote_in_chain(&self, operation: Operation) -> bool {
        self.tiers
            .iter()
            .any(|t| t.tier() == Tier::Remote && t.is_available() && t.supports(operation))
    }

    fn check_image(&self, image: &[u8]) -> Result<()> {
        if image.is_empty() {
            return Err(BrandmarkError::InvalidRequest(
                "image must not be empty".to_string(),
            ));
        }
        let max = self.limits.max_file_size_bytes();
        if image.len() as u64 > max {
            return Err(BrandmarkError::InvalidRequest(format!(
                "image is {} bytes, limit is {} MB",
                image.len(),
                self.limits.max_file_size_mb
            )));
        }
        Ok(())
    }
}

fn check_profile(profile: &BusinessProfile) -> Result<()> {
    if profile.name.trim().is_empty() || profile.business_type.trim().is_empty() {
        return Err(BrandmarkError::InvalidRequest(
            "business name and type are required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyntheticConfig;

    async fn local_orchestrator(dir: &std::path::Path) -> Orchestrator {
        let mut config = Config::default();
        config.general.artifact_dir = dir.to_path_buf();
        config.remote.api_key = String::new();
        config.reasoning.api_key = String::new();
        config.synthetic = SyntheticConfig {
            load_system_fonts: false,
            ..SyntheticConfig::default()
        };
        Orchestrator::new(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_new_without_credentials_has_local_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = local_orchestrator(dir.path()).await;
        let status = orchestrator.status();
        assert_eq!(status.tiers, vec![Tier::Raster, Tier::Synthetic]);
        assert!(!status.remote.available);
        assert!(!status.capabilities.image_generation);
        assert!(status.capabilities.business_analysis);
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = local_orchestrator(dir.path()).await;
        let err = orchestrator
            .generate_from_text("  \n ", TextOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BrandmarkError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_empty_and_oversized_images_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut orchestrator = local_orchestrator(dir.path()).await;
        let err = orchestrator
            .enhance(&[], EnhancementOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BrandmarkError::InvalidRequest(_)));

        orchestrator.limits.max_file_size_mb = 1;
        let big = vec![0u8; 1024 * 1024 + 1];
        let err = orchestrator
            .generate_from_reference(&big, ReferenceOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("limit is 1 MB"));
        assert_eq!(orchestrator.store().staged_count(), 0);
    }

    #[tokio::test]
    async fn test_profile_requires_name_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = local_orchestrator(dir.path()).await;
        let profile = BusinessProfile {
            name: "Nimbus".into(),
            ..BusinessProfile::default()
        };
        assert!(orchestrator.analyze_business(&profile).await.is_err());
        assert!(orchestrator.describe(&profile, &[], &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_text_generation_falls_through_to_synthetic() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = local_orchestrator(dir.path()).await;
        let outcome = orchestrator
            .generate_from_text("A modern logo for TechStart", TextOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.metadata.tier_used, Tier::Synthetic);
        assert!(outcome
            .prompt
            .as_deref()
            .unwrap()
            .starts_with("Create a professional logo: A modern logo for TechStart."));

        let response = outcome.to_response(orchestrator.download_prefix());
        assert_eq!(
            response.url,
            format!("/api/logo/download/{}", outcome.artifact.filename)
        );
    }
}
