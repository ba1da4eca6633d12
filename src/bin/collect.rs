use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dependabot_stats::collector::persist;
use dependabot_stats::{Collector, Config, DependabotTitleParser, GitHubClient};

#[derive(Parser, Debug)]
#[command(name = "dependabot-collect")]
#[command(version)]
#[command(about = "Download merged Dependabot pull requests of an organisation to CSV")]
struct Args {
    /// Account owning the repositories
    #[arg(long, default_value = "alphagov")]
    user: String,

    /// Repository topic to select
    #[arg(long, default_value = "govuk")]
    topic: String,

    /// CSV file to write
    #[arg(long, default_value = "data.csv")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("dependabot_stats=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let github = GitHubClient::from_config(&config)?;
    let rate_limit = github
        .rate_limit()
        .await
        .context("Failed to fetch GitHub rate limit")?;
    let search = &rate_limit.resources.search;
    tracing::info!(
        "Search rate limit: {}/{} remaining, resets at {}",
        search.remaining,
        search.limit,
        chrono::DateTime::from_timestamp(search.reset, 0)
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| search.reset.to_string())
    );

    let collector = Collector::new(github, DependabotTitleParser::new()?).with_progress();

    let repos = collector
        .list_repositories(&args.user, &args.topic)
        .await
        .with_context(|| format!("Failed to list {} repositories of {}", args.topic, args.user))?;
    tracing::info!("{} repos to download", repos.len());

    let written = match persist(collector.list_pull_requests(&repos), &args.output).await {
        Ok(written) => written,
        Err(e) => {
            if e.is_data_error() {
                tracing::error!("Pull request titles no longer match the expected format");
            }
            return Err(anyhow::Error::new(e).context(format!(
                "Failed to collect pull requests into {}",
                args.output.display()
            )));
        }
    };

    tracing::info!("Wrote {} pull requests to {}", written, args.output.display());
    Ok(())
}
