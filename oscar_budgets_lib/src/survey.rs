//! End-to-end survey: index page, per-film pages, aggregate.
//!
//! Uses Semaphore + JoinSet + mpsc for bounded concurrent fetching. Each
//! film is processed independently and only the aggregate step sees all
//! of them.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use wikipedia_pages::PageSource;

use crate::aggregate::{average, ItemRecord};
use crate::detail::extract_budget_text;
use crate::error::SurveyError;
use crate::exchange_rates::RateTable;
use crate::listing::{check_expected_count, extract_items, ItemStub};
use crate::markup::Document;
use crate::money;
use crate::normalize::normalize;

pub const DEFAULT_INDEX_PATH: &str = "/wiki/Academy_Award_for_Best_Picture";
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Knobs for a survey run.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// Address of the page listing every winner.
    pub index_path: String,
    /// Maximum number of film pages in flight. `1` processes films one by one.
    pub concurrency: usize,
    /// When set, the listing must yield exactly this many films.
    pub expected_count: Option<usize>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            index_path: DEFAULT_INDEX_PATH.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            expected_count: None,
        }
    }
}

/// Result of a complete run. Records are in index-page order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyReport {
    pub records: Vec<ItemRecord>,
    pub average: f64,
}

impl SurveyReport {
    pub fn known_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.amount.value().is_some())
            .count()
    }
}

/// Drives the extraction pipeline over one page source.
pub struct Survey<S> {
    source: Arc<S>,
    rates: Arc<RateTable>,
    config: SurveyConfig,
}

impl<S: PageSource + 'static> Survey<S> {
    pub fn new(source: S, rates: RateTable, config: SurveyConfig) -> Self {
        Self {
            source: Arc::new(source),
            rates: Arc::new(rates),
            config,
        }
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Fetches the index page and returns the winners in page order.
    pub async fn list_items(&self) -> Result<Vec<ItemStub>, SurveyError> {
        let address = &self.config.index_path;
        let page = fetch_page(&*self.source, address).await?;
        let doc = Document::parse(&page).map_err(|e| SurveyError::markup(address, e))?;
        let items = extract_items(&doc)?;
        check_expected_count(&items, self.config.expected_count)?;
        tracing::info!("found {} winners on {}", items.len(), address);
        Ok(items)
    }

    /// Fetches and processes a single film page.
    pub async fn resolve_item(&self, stub: ItemStub) -> Result<ItemRecord, SurveyError> {
        resolve(&*self.source, &self.rates, stub).await
    }

    /// Runs the whole survey. `on_record` sees films in index-page order,
    /// each one as soon as it and every film before it has resolved.
    pub async fn run<F>(&self, on_record: F) -> Result<SurveyReport, SurveyError>
    where
        F: FnMut(&ItemRecord),
    {
        let items = self.list_items().await?;
        let records = self.resolve_all(items, on_record).await?;
        let average = average(&records)?;
        let report = SurveyReport { records, average };
        tracing::info!(
            "average budget over {} of {} films: {:.2}",
            report.known_count(),
            report.records.len(),
            report.average
        );
        Ok(report)
    }

    /// Resolves every stub with at most `concurrency` pages in flight.
    ///
    /// The first error aborts the remaining work and is returned; nothing
    /// partial reaches the caller.
    pub async fn resolve_all<F>(
        &self,
        items: Vec<ItemStub>,
        mut on_record: F,
    ) -> Result<Vec<ItemRecord>, SurveyError>
    where
        F: FnMut(&ItemRecord),
    {
        let total = items.len();
        let concurrency = self.config.concurrency.max(1);

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let (tx, mut rx) =
            mpsc::channel::<(usize, Result<ItemRecord, SurveyError>)>(concurrency * 2);
        let mut join_set = JoinSet::new();

        for (index, stub) in items.into_iter().enumerate() {
            let sem = Arc::clone(&semaphore);
            let sender = tx.clone();
            let source = Arc::clone(&self.source);
            let rates = Arc::clone(&self.rates);

            join_set.spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return;
                };
                let result = resolve(&*source, &rates, stub).await;
                let _ = sender.send((index, result)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<ItemRecord>> = (0..total).map(|_| None).collect();
        let mut emitted = 0;
        while let Some((index, result)) = rx.recv().await {
            match result {
                Ok(record) => {
                    tracing::debug!(
                        "{} ({}): {}",
                        record.stub.title,
                        record.stub.year,
                        record.raw
                    );
                    slots[index] = Some(record);
                    while let Some(Some(ready)) = slots.get(emitted) {
                        on_record(ready);
                        emitted += 1;
                    }
                }
                Err(err) => {
                    tracing::error!("stopping survey: {}", err);
                    join_set.abort_all();
                    return Err(err);
                }
            }
        }

        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                return Err(SurveyError::Worker(e.to_string()));
            }
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| SurveyError::Worker("a film finished without a record".into()))
    }
}

async fn fetch_page<S: PageSource + ?Sized>(
    source: &S,
    address: &str,
) -> Result<String, SurveyError> {
    source
        .fetch(address)
        .await
        .map_err(|source| SurveyError::Fetch {
            address: address.to_string(),
            source,
        })
}

async fn resolve<S: PageSource + ?Sized>(
    source: &S,
    rates: &RateTable,
    stub: ItemStub,
) -> Result<ItemRecord, SurveyError> {
    let page = fetch_page(source, &stub.identifier).await?;
    assemble_record(stub, &page, rates)
}

/// Runs detail extraction, parsing, and normalization over fetched page text.
pub fn assemble_record(
    stub: ItemStub,
    page: &str,
    rates: &RateTable,
) -> Result<ItemRecord, SurveyError> {
    let doc = Document::parse(page).map_err(|e| SurveyError::markup(&stub.identifier, e))?;
    let raw = extract_budget_text(&doc, &stub.identifier)?;
    let parsed = money::parse(&raw).map_err(|source| SurveyError::Parse {
        item: stub.identifier.clone(),
        source,
    })?;
    let amount = normalize(&parsed, &stub.year, &stub.identifier, rates)?;
    Ok(ItemRecord { stub, raw, amount })
}
