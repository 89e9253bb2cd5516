//! Error types for the survey pipeline.

use crate::exchange_rates::ExchangeRateError;
use crate::markup::MarkupError;
use crate::money::MoneyParseError;

/// Every fatal condition the survey can hit.
///
/// None of these are retried or skipped: the population size is asserted
/// by callers, so dropping an item would silently skew the average.
/// A missing budget row is not an error; it flows through as
/// [`RawMoney::NotAvailable`](crate::RawMoney::NotAvailable).
#[derive(thiserror::Error, Debug)]
pub enum SurveyError {
    /// The page source could not deliver a page.
    #[error("failed to fetch {address}: {source}")]
    Fetch {
        address: String,
        #[source]
        source: wikipedia_pages::Error,
    },
    /// Page text could not be turned into a document.
    #[error("markup error on {address}: {source}")]
    Markup {
        address: String,
        #[source]
        source: MarkupError,
    },
    /// An expected table, list item, or link is absent.
    #[error("structure not found on {page}: {detail}")]
    StructureNotFound { page: String, detail: String },
    /// More than one candidate row was found where exactly one is allowed.
    #[error("more than one {field} row ({count}) found on {item}")]
    AmbiguousField {
        item: String,
        field: String,
        count: usize,
    },
    /// Money text is present but does not follow the money grammar.
    #[error("could not parse budget of {item}: {source}")]
    Parse {
        item: String,
        #[source]
        source: MoneyParseError,
    },
    /// The item's year has no GBP conversion rate.
    #[error("no GBP to USD rate for year {year} (needed by {item})")]
    CurrencyRateMissing { item: String, year: String },
    /// The normalized amount is below the plausibility floor.
    #[error("the budget calculated for {item} is {value}; it's too small")]
    ValueTooSmall { item: String, value: f64 },
    /// No record carried a budget, so there is nothing to average.
    #[error("no items with a known budget to average")]
    EmptyPopulation,
    /// The listing yielded a different number of items than the caller expects.
    #[error("expected {expected} items on the index page, found {found}")]
    PopulationMismatch { expected: usize, found: usize },
    /// The embedded exchange-rate table is invalid.
    #[error("exchange rate table: {0}")]
    ExchangeRates(#[from] ExchangeRateError),
    /// A built-in extraction pattern failed to compile.
    #[error("regex compile error: {0}")]
    Pattern(#[from] regex::Error),
    /// A worker task panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl SurveyError {
    pub(crate) fn structure(page: &str, detail: impl Into<String>) -> Self {
        Self::StructureNotFound {
            page: page.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn markup(address: &str, source: MarkupError) -> Self {
        Self::Markup {
            address: address.to_string(),
            source,
        }
    }
}
