//! The `budget` subcommand: trace one film page through the pipeline.

use anyhow::Result;
use clap::Args;
use oscar_budgets_lib::money::{self, ParsedMoney};
use oscar_budgets_lib::{
    format_amount, load_rate_table, ItemStub, PageSource, Survey, SurveyConfig,
};
use serde::Serialize;

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct BudgetArgs {
    /// Film page address, e.g. /wiki/Hamlet_(1948_film)
    #[arg(long)]
    pub path: String,

    /// Ceremony year as written on the index page (selects the GBP rate)
    #[arg(long)]
    pub year: String,

    /// Display name; defaults to the page address
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Serialize)]
struct BudgetTrace<'a> {
    #[serde(flatten)]
    record: &'a oscar_budgets_lib::ItemRecord,
    parsed: &'a ParsedMoney,
}

pub async fn run<S: PageSource + 'static>(
    args: &BudgetArgs,
    source: S,
    format: &OutputFormat,
) -> Result<()> {
    let stub = ItemStub {
        identifier: args.path.clone(),
        title: args.title.clone().unwrap_or_else(|| args.path.clone()),
        year: args.year.clone(),
    };
    let survey = Survey::new(source, load_rate_table()?, SurveyConfig::default());
    let record = survey.resolve_item(stub).await?;
    let parsed = money::parse(&record.raw)?;

    match format {
        OutputFormat::Json => print_json(&BudgetTrace {
            record: &record,
            parsed: &parsed,
        }),
        _ => {
            println!("Film:     {} ({})", record.stub.title, record.stub.year);
            println!("Raw:      {}", record.raw);
            match &parsed {
                ParsedMoney::NotAvailable => println!("Parsed:   N/A"),
                ParsedMoney::Parsed {
                    currency,
                    digits,
                    unit,
                } => println!(
                    "Parsed:   currency={:?} digits={:?} unit={:?}",
                    currency, digits, unit
                ),
            }
            match record.amount.value() {
                Some(v) => println!("USD:      ${}", format_amount(v)),
                None => println!("USD:      N/A"),
            }
        }
    }

    Ok(())
}
