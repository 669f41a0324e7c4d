//! Brandmark CLI - logo generation and enhancement with tiered fallbacks.
//!
//! Every command prints JSON to stdout; logs go to stderr. Without API keys
//! the local tiers still produce an artifact for every request.
//!
//! # Usage
//!
//! ```bash
//! # Generate a logo from a description
//! brandmark generate "A modern logo for TechStart" --color "#2563eb"
//!
//! # Enhance an existing logo
//! brandmark enhance logo.png --type style --style vintage
//!
//! # Restyle a reference logo
//! brandmark reference old.png --business-name Nimbus --modify "use teal"
//!
//! # Fetch an artifact by name
//! brandmark download synthetic-1700000000000-42.png -o logo.png
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Brandmark - logo generation and enhancement with tiered fallbacks.
#[derive(Parser, Debug)]
#[command(name = "brandmark")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long = "config", global = true, env = "BRANDMARK_CONFIG")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Enhance an existing image (remote edit, then local transforms)
    Enhance(cli::generate::EnhanceArgs),

    /// Generate a logo from a text description
    Generate(cli::generate::GenerateArgs),

    /// Create a logo from a reference image
    Reference(cli::generate::ReferenceArgs),

    /// Copy a stored artifact out of the artifact directory
    Download(cli::generate::DownloadArgs),

    /// Show which tiers and backends are available
    Status,

    /// Analyze a business for logo design insights
    Analyze(cli::assist::AnalyzeArgs),

    /// Write a detailed creative logo description
    Describe(cli::assist::DescribeArgs),

    /// Show the instruction that would be sent for a description
    Prompt(cli::assist::PromptArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match cli::load_config(cli.config_file.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config_file.is_some() => {
            return Err(anyhow::anyhow!(e).context("Failed to load --config file"));
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `brandmark config path`."
            );
            brandmark_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Brandmark v{}", brandmark_core::VERSION);

    match cli.command {
        Commands::Enhance(args) => cli::generate::enhance(args, &config).await,
        Commands::Generate(args) => cli::generate::generate(args, &config).await,
        Commands::Reference(args) => cli::generate::reference(args, &config).await,
        Commands::Download(args) => cli::generate::download(args, &config).await,
        Commands::Status => cli::assist::status(&config).await,
        Commands::Analyze(args) => cli::assist::analyze(args, &config).await,
        Commands::Describe(args) => cli::assist::describe(args, &config).await,
        Commands::Prompt(args) => cli::assist::prompt(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config, cli.config_file).await,
    }
}
