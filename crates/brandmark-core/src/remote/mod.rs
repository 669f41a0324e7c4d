//! Remote generation adapter.
//!
//! Wraps a multimodal image backend for three calls that differ only in
//! payload: text to image, image plus text to image (reference edits), and
//! enhancement as an edit. Results are persisted with a call-specific prefix.

pub mod gemini;

use async_trait::async_trait;
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RemoteConfig;
use crate::error::TierResult;
use crate::store::ArtifactStore;
use crate::types::Artifact;

pub use gemini::GeminiBackend;

/// Base64 image payload sent inline with a request.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: String,
    pub mime_type: String,
}

impl ImageInput {
    /// Encode raw bytes, detecting the MIME type from content.
    ///
    /// Unrecognized content is labelled `image/png`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mime_type = image::guess_format(bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or("image/png");
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        }
    }
}

/// One request to a remote image backend.
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    pub instruction: String,
    pub image: Option<ImageInput>,
}

/// Decoded image returned by a backend.
#[derive(Debug, Clone)]
pub struct RemoteImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub model: String,
}

impl RemoteImage {
    /// File extension matching the returned MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// A remote multimodal image model.
///
/// Uses `async_trait` so backends can be held as `Box<dyn ImageBackend>`.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Model identifier recorded in metadata.
    fn model(&self) -> &str;

    /// Generate an image; fails with `RemoteService` when no image comes back.
    async fn generate(&self, request: &RemoteRequest) -> TierResult<RemoteImage>;
}

/// Create the configured remote backend.
///
/// An absent API key yields a `Configuration` error; callers treat that as
/// "tier disabled".
pub fn backend_from_config(
    config: &RemoteConfig,
    timeout: Duration,
) -> TierResult<Box<dyn ImageBackend>> {
    Ok(Box::new(GeminiBackend::from_config(config, timeout)?))
}

/// Filename prefixes for remote artifacts.
pub mod prefix {
    pub const GENERATED: &str = "remote-generated";
    pub const EDITED: &str = "remote-edited";
    pub const ENHANCED: &str = "remote-enhanced";
}

/// Persisted remote output.
#[derive(Debug, Clone)]
pub struct RemoteArtifact {
    pub artifact: Artifact,
    pub model: String,
}

/// Remote backend plus the store its outputs land in.
#[derive(Clone)]
pub struct RemoteAdapter {
    backend: Arc<dyn ImageBackend>,
    store: ArtifactStore,
}

impl RemoteAdapter {
    pub fn new(backend: Box<dyn ImageBackend>, store: ArtifactStore) -> Self {
        Self {
            backend: Arc::from(backend),
            store,
        }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Text to image.
    pub async fn text_to_image(&self, instruction: &str) -> TierResult<RemoteArtifact> {
        self.run(prefix::GENERATED, instruction, None).await
    }

    /// Image plus instruction to image.
    pub async fn edit_image(&self, image: &[u8], instruction: &str) -> TierResult<RemoteArtifact> {
        self.run(prefix::EDITED, instruction, Some(ImageInput::from_bytes(image)))
            .await
    }

    /// Enhancement expressed as an edit.
    pub async fn enhance_image(
        &self,
        image: &[u8],
        instruction: &str,
    ) -> TierResult<RemoteArtifact> {
        self.run(prefix::ENHANCED, instruction, Some(ImageInput::from_bytes(image)))
            .await
    }

    async fn run(
        &self,
        prefix: &str,
        instruction: &str,
        image: Option<ImageInput>,
    ) -> TierResult<RemoteArtifact> {
        tracing::debug!(
            "{} request ({}, image: {}): {:.60}",
            self.backend.name(),
            prefix,
            image.is_some(),
            instruction
        );
        let request = RemoteRequest {
            instruction: instruction.to_string(),
            image,
        };
        let output = self.backend.generate(&request).await?;
        let extension = output.extension();
        let artifact = self.store.write(prefix, extension, output.bytes).await?;
        Ok(RemoteArtifact {
            artifact,
            model: output.model,
        })
    }
}
