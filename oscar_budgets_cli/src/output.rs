use anyhow::Result;
use oscar_budgets_lib::{format_amount, CanonicalAmount, ItemRecord, ItemStub};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Text,
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct RecordRow {
    #[tabled(rename = "Film")]
    #[serde(rename = "Film")]
    title: String,
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: String,
    #[tabled(rename = "Budget")]
    #[serde(rename = "Budget")]
    raw: String,
    #[tabled(rename = "USD")]
    #[serde(rename = "USD")]
    usd: String,
}

#[derive(Tabled, Serialize)]
struct ItemRow {
    #[tabled(rename = "Film")]
    #[serde(rename = "Film")]
    title: String,
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: String,
    #[tabled(rename = "Page")]
    #[serde(rename = "Page")]
    identifier: String,
}

// -- Row builders --

fn build_record_rows(records: &[ItemRecord]) -> Vec<RecordRow> {
    records
        .iter()
        .map(|r| RecordRow {
            title: r.stub.title.clone(),
            year: r.stub.year.clone(),
            raw: r.raw.to_string(),
            usd: format_usd(&r.amount),
        })
        .collect()
}

fn build_item_rows(items: &[ItemStub]) -> Vec<ItemRow> {
    items
        .iter()
        .map(|i| ItemRow {
            title: i.title.clone(),
            year: i.year.clone(),
            identifier: i.identifier.clone(),
        })
        .collect()
}

// -- Text output --

/// One line per film, printed as soon as the film resolves.
pub fn record_line(record: &ItemRecord) -> String {
    format!("{} ({}): {}", record.stub.title, record.stub.year, record.raw)
}

pub fn average_line(average: f64) -> String {
    format!("Average budget: ${}", format_amount(average))
}

pub fn print_items_text(items: &[ItemStub]) {
    for item in items {
        println!("{} ({}) {}", item.title, item.year, item.identifier);
    }
}

// -- Table output --

pub fn print_records_table(records: &[ItemRecord]) {
    println!("{}", Table::new(build_record_rows(records)));
}

pub fn print_items_table(items: &[ItemStub]) {
    println!("{}", Table::new(build_item_rows(items)));
}

// -- Markdown output --

pub fn print_records_markdown(records: &[ItemRecord]) {
    let mut table = Table::new(build_record_rows(records));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_items_markdown(items: &[ItemStub]) {
    let mut table = Table::new(build_item_rows(items));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_records_csv(records: &[ItemRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_record_rows(records) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_items_csv(items: &[ItemStub]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_item_rows(items) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_usd(amount: &CanonicalAmount) -> String {
    match amount.value() {
        Some(v) => format!("${}", format_amount(v)),
        None => "N/A".to_string(),
    }
}
