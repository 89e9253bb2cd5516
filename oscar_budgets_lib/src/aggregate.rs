//! Combining per-film records into the survey result.

use serde::Serialize;

use crate::error::SurveyError;
use crate::listing::ItemStub;
use crate::money::RawMoney;
use crate::normalize::CanonicalAmount;

/// Everything known about one winner once its page has been processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    #[serde(flatten)]
    pub stub: ItemStub,
    pub raw: RawMoney,
    pub amount: CanonicalAmount,
}

/// Mean of the known budgets. Films without a budget count toward
/// neither the sum nor the divisor.
pub fn average(records: &[ItemRecord]) -> Result<f64, SurveyError> {
    let known: Vec<f64> = records.iter().filter_map(|r| r.amount.value()).collect();
    if known.is_empty() {
        return Err(SurveyError::EmptyPopulation);
    }
    Ok(known.iter().sum::<f64>() / known.len() as f64)
}

/// Formats an amount with thousands separators and two decimals,
/// e.g. `12,345,678.90`.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}
