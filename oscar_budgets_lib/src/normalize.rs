//! Conversion of parsed budget text into a single US dollar amount.

use serde::Serialize;

use crate::error::SurveyError;
use crate::exchange_rates::RateTable;
use crate::money::{digit_values, MoneyParseError, ParsedMoney};

/// Smallest budget accepted as real. Anything lower means the parser
/// picked up something else, such as a year or a page number.
pub const MIN_PLAUSIBLE_BUDGET: f64 = 10_000.0;

const MILLION: f64 = 1_000_000.0;

/// Budget in US dollars, or the explicit "no figure" value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalAmount {
    NotAvailable,
    Amount(f64),
}

impl CanonicalAmount {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::NotAvailable => None,
            Self::Amount(v) => Some(*v),
        }
    }
}

/// Currencies seen in budget rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Gbp,
}

impl Currency {
    /// Any marker mentioning the pound sign is sterling; everything else,
    /// including no marker at all, is taken as dollars.
    pub fn from_marker(marker: &str) -> Self {
        if marker.contains('£') {
            Self::Gbp
        } else {
            Self::Usd
        }
    }
}

/// Turns a parsed budget into US dollars.
///
/// Applied in order: a range collapses to its midpoint, pounds convert at
/// the rate for `year`, and a `million` unit scales by 1,000,000. The result
/// must reach [`MIN_PLAUSIBLE_BUDGET`].
pub fn normalize(
    parsed: &ParsedMoney,
    year: &str,
    identifier: &str,
    rates: &RateTable,
) -> Result<CanonicalAmount, SurveyError> {
    let (currency, digits, unit) = match parsed {
        ParsedMoney::NotAvailable => return Ok(CanonicalAmount::NotAvailable),
        ParsedMoney::Parsed {
            currency,
            digits,
            unit,
        } => (currency, digits, unit),
    };

    let values = digit_values(digits).map_err(|reason| SurveyError::Parse {
        item: identifier.to_string(),
        source: MoneyParseError {
            text: digits.clone(),
            reason,
        },
    })?;
    let mut value = values.iter().sum::<f64>() / values.len() as f64;

    if Currency::from_marker(currency) == Currency::Gbp {
        let rate = rates
            .get(year)
            .ok_or_else(|| SurveyError::CurrencyRateMissing {
                item: identifier.to_string(),
                year: year.to_string(),
            })?;
        value *= rate;
    }

    if unit.to_lowercase().contains("million") {
        value *= MILLION;
    }

    if value < MIN_PLAUSIBLE_BUDGET {
        return Err(SurveyError::ValueTooSmall {
            item: identifier.to_string(),
            value,
        });
    }

    Ok(CanonicalAmount::Amount(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange_rates::load_rate_table;

    fn rates() -> RateTable {
        load_rate_table().unwrap()
    }

    fn amount(result: Result<CanonicalAmount, SurveyError>) -> f64 {
        result.unwrap().value().unwrap()
    }

    #[test]
    fn not_available_passes_through() {
        let out = normalize(&ParsedMoney::NotAvailable, "1927/28", "/wiki/Wings", &rates());
        assert_eq!(out.unwrap(), CanonicalAmount::NotAvailable);
    }

    #[test]
    fn dollars_in_millions() {
        let parsed = ParsedMoney::new("$", "19", "million");
        let out = normalize(&parsed, "1991", "/wiki/The_Silence_of_the_Lambs", &rates());
        assert_eq!(out.unwrap(), CanonicalAmount::Amount(19_000_000.0));
    }

    #[test]
    fn pound_range_averaged_and_converted() {
        let parsed = ParsedMoney::new("£", "6\u{2013}7", "million");
        let value = amount(normalize(&parsed, "1948", "/wiki/Hamlet_(1948_film)", &rates()));
        assert!((value - 26_195_000.0).abs() < 1e-3, "got {}", value);
    }

    #[test]
    fn plain_dollars_with_trailing_period() {
        let parsed = ParsedMoney::new("$", "2840000.", "");
        let value = amount(normalize(&parsed, "1950", "/wiki/All_About_Eve", &rates()));
        assert_eq!(value, 2_840_000.0);
    }

    #[test]
    fn decimal_millions() {
        let parsed = ParsedMoney::new("$", "1.25", "million");
        let value = amount(normalize(&parsed, "1955", "/wiki/Marty_(film)", &rates()));
        assert_eq!(value, 1_250_000.0);
    }

    #[test]
    fn unit_match_ignores_case() {
        let parsed = ParsedMoney::new("$", "3", "Million");
        let value = amount(normalize(&parsed, "1960", "/wiki/The_Apartment", &rates()));
        assert_eq!(value, 3_000_000.0);
    }

    #[test]
    fn pounds_without_rate_are_fatal() {
        let parsed = ParsedMoney::new("£", "2", "million");
        match normalize(&parsed, "1949", "/wiki/Unlisted", &rates()) {
            Err(SurveyError::CurrencyRateMissing { item, year }) => {
                assert_eq!(item, "/wiki/Unlisted");
                assert_eq!(year, "1949");
            }
            other => panic!("expected CurrencyRateMissing, got {:?}", other),
        }
    }

    #[test]
    fn dollars_ignore_rate_table() {
        let parsed = ParsedMoney::new("$", "2", "million");
        let value = amount(normalize(&parsed, "1927/28", "/wiki/Wings", &RateTable::default()));
        assert_eq!(value, 2_000_000.0);
    }

    #[test]
    fn implausible_value_is_fatal() {
        let parsed = ParsedMoney::new("$", "500", "");
        match normalize(&parsed, "1930", "/wiki/Tiny", &rates()) {
            Err(SurveyError::ValueTooSmall { item, value }) => {
                assert_eq!(item, "/wiki/Tiny");
                assert_eq!(value, 500.0);
            }
            other => panic!("expected ValueTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let parsed = ParsedMoney::new("$", "10000", "");
        let value = amount(normalize(&parsed, "1930", "/wiki/Edge", &rates()));
        assert_eq!(value, MIN_PLAUSIBLE_BUDGET);
    }

    #[test]
    fn bad_digits_are_parse_errors() {
        let parsed = ParsedMoney::new("$", "1.2.3", "million");
        assert!(matches!(
            normalize(&parsed, "1930", "/wiki/Bad", &rates()),
            Err(SurveyError::Parse { .. })
        ));
    }

    #[test]
    fn normalize_is_pure() {
        let table = rates();
        let parsed = ParsedMoney::new("£", "6\u{2013}7", "million");
        let first = normalize(&parsed, "1948", "/wiki/Hamlet_(1948_film)", &table).unwrap();
        let _ = normalize(&ParsedMoney::new("$", "19", "million"), "1991", "/wiki/X", &table);
        let second = normalize(&parsed, "1948", "/wiki/Hamlet_(1948_film)", &table).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn currency_from_marker() {
        assert_eq!(Currency::from_marker("£"), Currency::Gbp);
        assert_eq!(Currency::from_marker("$"), Currency::Usd);
        assert_eq!(Currency::from_marker("US$"), Currency::Usd);
        assert_eq!(Currency::from_marker(""), Currency::Usd);
    }
}
