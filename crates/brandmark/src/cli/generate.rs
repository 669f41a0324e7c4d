//! The `enhance`, `generate`, `reference` and `download` commands.

use anyhow::Context;
use brandmark_core::{
    Config, EnhancementOptions, EnhancementType, Orchestrator, Outcome, ReferenceOptions,
    TextOptions,
};
use clap::Args;
use std::path::{Path, PathBuf};

use super::{expand_path, print_json};

/// Arguments for the `enhance` command.
#[derive(Args, Debug)]
pub struct EnhanceArgs {
    /// Image to enhance
    pub input: PathBuf,

    /// Enhancement type: quality, style, or resolution
    #[arg(short = 't', long = "type", default_value = "quality")]
    pub kind: EnhancementType,

    /// Style variant (modern, vintage, bold, ...)
    #[arg(short, long, default_value = "modern")]
    pub style: String,

    /// Extra instruction for the remote model
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Also copy the result to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Description of the logo
    pub description: String,

    /// Style (modern, vintage, bold, playful, ...)
    #[arg(short, long, default_value = "modern")]
    pub style: String,

    /// Hex color; repeat for more (first is primary)
    #[arg(short, long = "color")]
    pub colors: Vec<String>,

    /// Business type (tech, bakery, ...)
    #[arg(short, long)]
    pub business_type: Option<String>,

    /// Also copy the result to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `reference` command.
#[derive(Args, Debug)]
pub struct ReferenceArgs {
    /// Reference logo image
    pub input: PathBuf,

    /// Business name to feature
    #[arg(short = 'n', long)]
    pub business_name: Option<String>,

    /// "similar" keeps the reference style; anything else restyles it
    #[arg(short, long, default_value = "similar")]
    pub style: String,

    /// Modification to apply; repeat for more
    #[arg(short, long = "modify")]
    pub modifications: Vec<String>,

    /// Also copy the result to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `download` command.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Artifact file name
    pub filename: String,

    /// Destination file (defaults to the artifact name in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn enhance(args: EnhanceArgs, config: &Config) -> anyhow::Result<()> {
    let image = read_image(&args.input).await?;
    let orchestrator = Orchestrator::new(config).await?;
    let options = EnhancementOptions {
        kind: args.kind,
        style: args.style,
        custom_instruction: args.prompt,
    };

    let outcome = orchestrator.enhance(&image, options).await?;
    finish(&orchestrator, &outcome, args.output.as_deref()).await
}

pub async fn generate(args: GenerateArgs, config: &Config) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(config).await?;
    let options = TextOptions {
        style: args.style,
        colors: args.colors,
        business_type: args.business_type,
    };

    let outcome = orchestrator
        .generate_from_text(&args.description, options)
        .await?;
    finish(&orchestrator, &outcome, args.output.as_deref()).await
}

pub async fn reference(args: ReferenceArgs, config: &Config) -> anyhow::Result<()> {
    let image = read_image(&args.input).await?;
    let orchestrator = Orchestrator::new(config).await?;
    let options = ReferenceOptions {
        business_name: args.business_name,
        style: args.style,
        modifications: args.modifications,
    };

    let outcome = orchestrator.generate_from_reference(&image, options).await?;
    finish(&orchestrator, &outcome, args.output.as_deref()).await
}

pub async fn download(args: DownloadArgs, config: &Config) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(config).await?;
    let bytes = orchestrator.download(&args.filename).await?;

    let destination = args
        .output
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| PathBuf::from(&args.filename));
    tokio::fs::write(&destination, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))?;

    tracing::info!("Wrote {} bytes to {}", bytes.len(), destination.display());
    println!("{}", destination.display());
    Ok(())
}

async fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    let path = expand_path(path);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Print the response and optionally copy the artifact.
async fn finish(
    orchestrator: &Orchestrator,
    outcome: &Outcome,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(output) = output {
        let output = expand_path(output);
        tokio::fs::write(&output, &outcome.artifact.content)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        tracing::info!("Copied {} to {}", outcome.artifact.filename, output.display());
    }
    print_json(&outcome.to_response(orchestrator.download_prefix()))
}
