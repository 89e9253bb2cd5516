use anyhow::Result;
use clap::Args;
use oscar_budgets_lib::survey::DEFAULT_INDEX_PATH;
use oscar_budgets_lib::{load_rate_table, PageSource, Survey, SurveyConfig};

use crate::output::{
    print_items_csv, print_items_markdown, print_items_table, print_items_text, print_json,
    OutputFormat,
};

#[derive(Args)]
pub struct ItemsArgs {
    /// Fail unless the index page lists exactly this many winners
    #[arg(long)]
    pub expected_count: Option<usize>,

    /// Address of the page listing the winners
    #[arg(long, default_value = DEFAULT_INDEX_PATH)]
    pub index_path: String,
}

pub async fn run<S: PageSource + 'static>(
    args: &ItemsArgs,
    source: S,
    format: &OutputFormat,
) -> Result<()> {
    let config = SurveyConfig {
        index_path: args.index_path.clone(),
        expected_count: args.expected_count,
        ..SurveyConfig::default()
    };
    let items = Survey::new(source, load_rate_table()?, config)
        .list_items()
        .await?;

    eprintln!("{} winners", items.len());

    match format {
        OutputFormat::Text => print_items_text(&items),
        OutputFormat::Table => print_items_table(&items),
        OutputFormat::Markdown => print_items_markdown(&items),
        OutputFormat::Csv => print_items_csv(&items)?,
        OutputFormat::Json => print_json(&items),
    }

    Ok(())
}
