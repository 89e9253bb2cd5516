mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use oscar_budgets_lib::{Client, RetryConfig, RetryingSource};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "oscar-budgets")]
#[command(about = "Average production budget of Academy Award Best Picture winners")]
struct Cli {
    /// Output format: text, table, json, csv, or markdown
    #[arg(long, default_value = "text", global = true)]
    output: String,

    /// Override the site base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every winner's budget and print the average
    Survey(commands::survey::SurveyArgs),
    /// List the winners found on the index page
    Items(commands::items::ItemsArgs),
    /// Show how a single film's budget is read
    Budget(commands::budget::BudgetArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("oscar_budgets=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "table" => OutputFormat::Table,
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Text,
    };

    let client = match &cli.base_url {
        Some(url) => Client::with_base_url(url)?,
        None => Client::new()?,
    };
    let source = RetryingSource::new(client, RetryConfig::from_env());

    match &cli.command {
        Commands::Survey(args) => commands::survey::run(args, source, &format).await?,
        Commands::Items(args) => commands::items::run(args, source, &format).await?,
        Commands::Budget(args) => commands::budget::run(args, source, &format).await?,
    }

    Ok(())
}
