use clap::{Parser, Subcommand};
use creatorlens_core::{AppConfig, CompetitorsFile, DateFilter};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "creatorlens-cli")]
#[command(about = "Run creator analytics from the command line and print JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze an Instagram profile against follower-tiered competitors
    Instagram {
        /// Instagram username to analyze
        #[arg(long)]
        username: String,
        /// Date filter, e.g. `7days`, `yesterday`, `2025-01-01 to 2025-01-31`
        #[arg(long)]
        date_filter: Option<String>,
        /// Apify API token
        #[arg(long, env = "APIFY_TOKEN", hide_env_values = true)]
        api_key: String,
    },
    /// Analyze a YouTube channel against the configured competitor channels
    Youtube {
        /// Channel handle, with or without the leading `@`
        #[arg(long)]
        handle: String,
        /// YouTube Data API key
        #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
        api_key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = creatorlens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let competitors = creatorlens_core::load_competitors_or_default(&config.competitors_path)?;

    match cli.command {
        Commands::Instagram {
            username,
            date_filter,
            api_key,
        } => {
            run_instagram(
                &config,
                &competitors,
                &username,
                date_filter.as_deref(),
                &api_key,
            )
            .await
        }
        Commands::Youtube { handle, api_key } => {
            run_youtube(&config, &competitors, &handle, &api_key).await
        }
    }
}

async fn run_instagram(
    config: &AppConfig,
    competitors: &CompetitorsFile,
    username: &str,
    date_filter: Option<&str>,
    api_key: &str,
) -> anyhow::Result<()> {
    let client = creatorlens_instagram::ApifyClient::with_base_url(
        api_key,
        config.http_timeout_secs,
        &config.apify_base_url,
        &config.user_agent,
    )?;
    let filter = DateFilter::parse(date_filter, chrono::Utc::now().naive_utc());
    let settings = creatorlens_instagram::AnalysisSettings::from_config(config);

    let report = creatorlens_instagram::analyze_profile(
        &client,
        &competitors.instagram,
        &settings,
        username,
        &filter,
    )
    .await?;
    print_json(&report)
}

async fn run_youtube(
    config: &AppConfig,
    competitors: &CompetitorsFile,
    handle: &str,
    api_key: &str,
) -> anyhow::Result<()> {
    let client = creatorlens_youtube::YoutubeClient::with_base_url(
        api_key,
        config.http_timeout_secs,
        &config.youtube_base_url,
        &config.user_agent,
    )?;

    let report = creatorlens_youtube::analyze_channel(&client, &competitors.youtube, handle).await?;
    print_json(&report)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
