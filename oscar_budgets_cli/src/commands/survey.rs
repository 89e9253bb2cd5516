//! The `survey` subcommand: every winner's budget and their average.

use anyhow::Result;
use clap::Args;
use oscar_budgets_lib::survey::{DEFAULT_CONCURRENCY, DEFAULT_INDEX_PATH};
use oscar_budgets_lib::{load_rate_table, PageSource, Survey, SurveyConfig};

use crate::output::{
    average_line, print_json, print_records_csv, print_records_markdown, print_records_table,
    record_line, OutputFormat,
};

#[derive(Args)]
pub struct SurveyArgs {
    /// Number of film pages fetched at once (1 = one at a time)
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Fail unless the index page lists exactly this many winners
    #[arg(long)]
    pub expected_count: Option<usize>,

    /// Address of the page listing the winners
    #[arg(long, default_value = DEFAULT_INDEX_PATH)]
    pub index_path: String,
}

pub async fn run<S: PageSource + 'static>(
    args: &SurveyArgs,
    source: S,
    format: &OutputFormat,
) -> Result<()> {
    let config = SurveyConfig {
        index_path: args.index_path.clone(),
        concurrency: args.concurrency,
        expected_count: args.expected_count,
    };
    let survey = Survey::new(source, load_rate_table()?, config);

    let streaming = matches!(format, OutputFormat::Text);
    let report = survey
        .run(|record| {
            if streaming {
                println!("{}", record_line(record));
            }
        })
        .await?;

    eprintln!(
        "{} of {} winners have a known budget",
        report.known_count(),
        report.records.len()
    );

    match format {
        OutputFormat::Text => println!("{}", average_line(report.average)),
        OutputFormat::Table => {
            print_records_table(&report.records);
            println!("{}", average_line(report.average));
        }
        OutputFormat::Markdown => {
            print_records_markdown(&report.records);
            println!();
            println!("{}", average_line(report.average));
        }
        OutputFormat::Csv => {
            print_records_csv(&report.records)?;
            eprintln!("{}", average_line(report.average));
        }
        OutputFormat::Json => print_json(&report),
    }

    Ok(())
}
