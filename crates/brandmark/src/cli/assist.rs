//! Planning commands: `status`, `analyze`, `describe` and `prompt`.

use brandmark_core::{BusinessProfile, Config, Orchestrator, TextOptions};
use clap::Args;

use super::print_json;

/// Business details shared by `analyze` and `describe`.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Business name
    #[arg(short = 'n', long)]
    pub name: String,

    /// Business type (tech, bakery, ...)
    #[arg(short = 't', long = "type")]
    pub business_type: String,

    /// Free-text description of the business
    #[arg(short, long)]
    pub description: Option<String>,

    /// Target audience
    #[arg(short, long)]
    pub audience: Option<String>,
}

impl ProfileArgs {
    fn into_profile(self) -> BusinessProfile {
        BusinessProfile {
            name: self.name,
            business_type: self.business_type,
            description: self.description,
            target_audience: self.audience,
        }
    }
}

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
}

/// Arguments for the `describe` command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Style preference; repeat for more
    #[arg(short, long = "style")]
    pub styles: Vec<String>,

    /// Keyword; repeat for more
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,
}

/// Arguments for the `prompt` command.
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Description of the logo
    pub description: String,

    #[arg(short, long, default_value = "modern")]
    pub style: String,

    /// Hex color; repeat for more
    #[arg(short, long = "color")]
    pub colors: Vec<String>,

    #[arg(short, long)]
    pub business_type: Option<String>,
}

pub async fn status(config: &Config) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(config).await?;
    print_json(&orchestrator.status())
}

pub async fn analyze(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(config).await?;
    let analysis = orchestrator
        .analyze_business(&args.profile.into_profile())
        .await?;
    print_json(&analysis)
}

pub async fn describe(args: DescribeArgs, config: &Config) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(config).await?;
    let described = orchestrator
        .describe(&args.profile.into_profile(), &args.styles, &args.keywords)
        .await?;
    print_json(&described)
}

pub async fn prompt(args: PromptArgs, config: &Config) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(config).await?;
    let options = TextOptions {
        style: args.style,
        colors: args.colors,
        business_type: args.business_type,
    };
    let instruction = orchestrator
        .enhance_prompt(&args.description, &options)
        .await?;
    print_json(&instruction)
}
