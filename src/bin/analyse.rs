use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dependabot_stats::analysis::monthly::write_monthly;
use dependabot_stats::analysis::report::{format_json, format_text};
use dependabot_stats::analysis::{
    libraries_report, load, load_with, monthly_counts, prs_report, LibrarySets, LoadOptions,
    SectionReport,
};
use dependabot_stats::AnalyzerConfig;

#[derive(Parser, Debug)]
#[command(name = "dependabot-analyse")]
#[command(version)]
#[command(about = "Summarise how long Dependabot pull requests took to merge")]
struct Cli {
    /// CSV file written by dependabot-collect
    #[arg(long, default_value = "data.csv", global = true)]
    input: PathBuf,

    /// Library to leave out of every statistic (repeatable, comma separated)
    #[arg(long = "ignore-library", value_delimiter = ',', global = true)]
    ignore_library: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overall, security and non-security merge times
    Prs,
    /// Merge times by library classification
    Libraries(LibraryArgs),
    /// Monthly counts by library classification, written as CSV.
    /// Counts every row, including pull requests opened before 2020-06-11.
    Monthly {
        #[command(flatten)]
        libraries: LibraryArgs,

        /// CSV file to write
        #[arg(long, default_value = "monthly_stats.csv")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct LibraryArgs {
    /// Internal library names; defaults to the application registry
    #[arg(long = "internal-libraries", value_delimiter = ',')]
    internal_libraries: Option<Vec<String>>,

    /// Framework library names
    #[arg(long = "framework-libraries", value_delimiter = ',')]
    framework_libraries: Option<Vec<String>>,
}

impl LibraryArgs {
    async fn resolve(self, config: &AnalyzerConfig) -> anyhow::Result<LibrarySets> {
        LibrarySets::resolve(
            self.internal_libraries,
            self.framework_libraries,
            &config.registry_url,
        )
        .await
        .context("Failed to resolve library lists")
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
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
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = AnalyzerConfig::from_env();
    let context = || format!("Failed to load {}", cli.input.display());

    match command {
        Command::Prs => {
            let records = load(&cli.input, &cli.ignore_library).with_context(context)?;
            let sections = prs_report(&records)?;
            output_sections(&sections, cli.format)?;
        }
        Command::Libraries(libraries) => {
            let records = load(&cli.input, &cli.ignore_library).with_context(context)?;
            let sets = libraries.resolve(&config).await?;
            let sections = libraries_report(&records, &sets)?;
            output_sections(&sections, cli.format)?;
        }
        Command::Monthly { libraries, output } => {
            let options = LoadOptions::new(&cli.ignore_library).without_cutover();
            let records = load_with(&cli.input, &options).with_context(context)?;
            let sets = libraries.resolve(&config).await?;
            let counts = monthly_counts(&records, &sets);
            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_monthly(&counts, file)?;
            tracing::info!("Wrote {} months to {}", counts.len(), output.display());
        }
    }

    Ok(())
}

fn output_sections(sections: &[SectionReport], format: OutputFormat) -> anyhow::Result<()> {
    let output = match format {
        OutputFormat::Text => format_text(sections),
        OutputFormat::Json => format_json(sections)?,
    };
    print!("{}", output);
    Ok(())
}
