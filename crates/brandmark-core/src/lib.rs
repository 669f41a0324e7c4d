//! Brandmark Core - logo generation and enhancement with tiered fallback.
//!
//! Every request returns a persisted image artifact, even when no network
//! backend is reachable. Requests walk a fixed chain of tiers:
//!
//! ```text
//! enhance    : Remote (edit) → Raster (quality/style/resolution)
//! text       : Remote (generate) → Synthetic (vector initials logo)
//! reference  : Remote (edit) → Raster (similar variant)
//! ```
//!
//! The remote tier is used only when its API key is configured. Instructions
//! sent to it are built by the prompt enhancer, optionally refined by a
//! reasoning model.
//!
//! # Usage
//!
//! ```rust,ignore
//! use brandmark_core::{Config, Orchestrator, TextOptions};
//!
//! #[tokio::main]
//! async fn main() -> brandmark_core::Result<()> {
//!     let config = Config::load()?;
//!     let orchestrator = Orchestrator::new(&config).await?;
//!
//!     let outcome = orchestrator
//!         .generate_from_text("A modern logo for TechStart", TextOptions::default())
//!         .await?;
//!     println!("{} via {}", outcome.artifact.filename, outcome.metadata.tier_used);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod raster;
pub mod remote;
pub mod store;
pub mod synthetic;
pub mod tier;
pub mod types;

// Re-exports for convenient access
pub use analysis::ImageAnalysis;
pub use config::Config;
pub use error::{BrandmarkError, ConfigError, Result, TierError, TierResult};
pub use orchestrator::{Orchestrator, ServiceStatus};
pub use prompt::{BusinessAnalysis, BusinessProfile, CreativeDescription, Instruction};
pub use store::{ArtifactStore, StagedInput};
pub use tier::TierBackend;
pub use types::{
    Artifact, EnhancementOptions, EnhancementType, GenerationRequest, GenerationResponse,
    Metadata, Operation, Outcome, ReferenceOptions, TextOptions, Tier,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
