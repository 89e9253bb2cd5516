//! GBP to USD conversion rates keyed by ceremony year.
//!
//! Follows the compile-time `include_str!` pattern: the table ships inside
//! the binary and is read-only for the lifetime of a run.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Error types for exchange-rate table operations.
#[derive(Error, Debug)]
pub enum ExchangeRateError {
    #[error("Failed to parse exchange rate YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Duplicate year in exchange rate file: {0}")]
    DuplicateYear(String),
    #[error("Rate for {year} must be positive, got {rate}")]
    InvalidRate { year: String, rate: f64 },
}

/// Top-level structure for the exchange rate YAML file.
#[derive(Deserialize, Debug)]
pub struct RateFile {
    pub rates: Vec<RateEntry>,
}

/// USD per GBP for one year.
#[derive(Deserialize, Debug, Clone)]
pub struct RateEntry {
    pub year: String,
    pub rate: f64,
}

/// Lookup table of USD-per-GBP rates. Years are never interpolated.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn get(&self, year: &str) -> Option<f64> {
        self.rates.get(year).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

/// Parse a rate table from YAML content.
pub fn parse_rate_table(yaml_content: &str) -> Result<RateTable, ExchangeRateError> {
    let file: RateFile = serde_yml::from_str(yaml_content)?;

    let mut rates = HashMap::new();
    for entry in file.rates {
        if entry.rate.is_nan() || entry.rate <= 0.0 {
            return Err(ExchangeRateError::InvalidRate {
                year: entry.year,
                rate: entry.rate,
            });
        }
        if rates.contains_key(&entry.year) {
            return Err(ExchangeRateError::DuplicateYear(entry.year));
        }
        rates.insert(entry.year, entry.rate);
    }

    Ok(RateTable { rates })
}

/// Load the rate table embedded at compile time.
pub fn load_rate_table() -> Result<RateTable, ExchangeRateError> {
    let yaml_content = include_str!("../../seed_data/gbp_usd_rates.yml");
    parse_rate_table(yaml_content)
}
