use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autosocial_core::analysis;
use autosocial_core::domain::contract::{
    ContentSuggestionRequest, OverallAnalysisRequest, PostAnalysisRequest,
};
use autosocial_core::inference::ModelRegistry;

mod input;

#[derive(Debug, Parser)]
#[command(name = "autosocial_cli")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarise one group of trending posts (needs the inference backend).
    AnalyzePosts {
        /// JSON file with a posts array.
        #[arg(long)]
        file: PathBuf,

        /// Label for the group, used in the trend title.
        #[arg(long)]
        group_key: String,
    },

    /// Aggregate platform and category patterns across all posts.
    OverallPatterns {
        #[arg(long)]
        file: PathBuf,
    },

    /// Build content suggestions from a `{trend_analysis, ai_insights}` JSON file.
    Suggestions {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = autosocial_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = run(args.command, &settings).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %format!("{err:#}"), "command failed");
    }
    result
}

async fn run(
    command: Command,
    settings: &autosocial_core::config::Settings,
) -> anyhow::Result<()> {
    let output = match command {
        Command::AnalyzePosts { file, group_key } => {
            let posts = input::read_posts(&file)?;
            tracing::info!(posts = posts.len(), %group_key, "analyzing post group");

            let models = ModelRegistry::load(settings).await?;
            let request = PostAnalysisRequest { posts, group_key };
            let report = analysis::analyze_posts(&models, &request).await?;
            serde_json::to_value(report)?
        }
        Command::OverallPatterns { file } => {
            let all_posts = input::read_posts(&file)?;
            let insights = analysis::analyze_overall_patterns(&OverallAnalysisRequest { all_posts })?;
            serde_json::to_value(insights)?
        }
        Command::Suggestions { file } => {
            let raw = input::read_json(&file)?;
            let request: ContentSuggestionRequest = serde_json::from_value(raw)
                .with_context(|| format!("{} is not a suggestion request", file.display()))?;
            serde_json::to_value(analysis::generate_content_suggestions(&request))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_sentry(settings: &autosocial_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
