//! Library layer for the Best Picture budget survey.
//!
//! Extracts the winners list from the Academy Award for Best Picture page,
//! pulls each winner's budget out of its infobox, normalizes the money text
//! into US dollars, and averages the known budgets.

pub mod aggregate;
pub mod client;
pub mod detail;
pub mod error;
pub mod exchange_rates;
pub mod listing;
pub mod markup;
pub mod money;
pub mod normalize;
pub mod survey;

pub use wikipedia_pages;
pub use wikipedia_pages::{Client, PageSource};

pub use aggregate::{average, format_amount, ItemRecord};
pub use client::{RetryConfig, RetryingSource};
pub use error::SurveyError;
pub use exchange_rates::{load_rate_table, RateTable};
pub use listing::ItemStub;
pub use markup::Document;
pub use money::{ParsedMoney, RawMoney};
pub use normalize::{CanonicalAmount, Currency, MIN_PLAUSIBLE_BUDGET};
pub use survey::{Survey, SurveyConfig, SurveyReport};
