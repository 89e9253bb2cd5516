//! Splitting free-form budget text into currency, digits, and unit.

use std::fmt;

use regex::Regex;
use serde::Serialize;

/// Range marker used between the two ends of an estimate (`£6–7 million`).
pub const RANGE_DASH: char = '\u{2013}';

/// Budget text as found on a film page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawMoney {
    NotAvailable,
    Text(String),
}

impl fmt::Display for RawMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "N/A"),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Budget text split into its three parts.
///
/// `digits` has grouping commas removed but keeps decimal points and the
/// range dash; `unit` is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedMoney {
    NotAvailable,
    Parsed {
        currency: String,
        digits: String,
        unit: String,
    },
}

impl ParsedMoney {
    pub fn new(currency: &str, digits: &str, unit: &str) -> Self {
        Self::Parsed {
            currency: currency.to_string(),
            digits: digits.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// Present budget text that does not follow the money grammar.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{reason} in {text:?}")]
pub struct MoneyParseError {
    pub text: String,
    pub reason: String,
}

impl MoneyParseError {
    fn new(text: &str, reason: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

const GENERAL_PATTERN: &str = r"^(\D*)\s?([\d,. \x{2013}]*)\s?(\D*)";
const DOLLAR_PATTERN: &str = r"(\$)\s?([\d,. \x{2013}]*)\s?(\D*)";
const POUND_PATTERN: &str = r"(£)\s?([\d,. \x{2013}]*)\s?(\D*)";

/// Splits budget text into `(currency, digits, unit)`.
///
/// Text carrying both `$` and `£` is matched against the dollar-anchored
/// grammar first and the pound-anchored one second.
pub fn parse(raw: &RawMoney) -> Result<ParsedMoney, MoneyParseError> {
    let text = match raw {
        RawMoney::NotAvailable => return Ok(ParsedMoney::NotAvailable),
        RawMoney::Text(text) => text,
    };

    let compile = |pattern: &str| {
        Regex::new(pattern)
            .map_err(|e| MoneyParseError::new(text, format!("regex compile error: {}", e)))
    };

    let mut parsed = None;
    if text.contains('$') && text.contains('£') {
        for pattern in [DOLLAR_PATTERN, POUND_PATTERN] {
            parsed = split_with(&compile(pattern)?, text);
            if parsed.is_some() {
                break;
            }
        }
    }
    let parsed = match parsed {
        Some(parsed) => parsed,
        None => split_with(&compile(GENERAL_PATTERN)?, text)
            .ok_or_else(|| MoneyParseError::new(text, "no amount found"))?,
    };

    if let ParsedMoney::Parsed { digits, .. } = &parsed {
        digit_values(digits).map_err(|reason| MoneyParseError::new(text, reason))?;
    }
    Ok(parsed)
}

fn split_with(re: &Regex, text: &str) -> Option<ParsedMoney> {
    let caps = re.captures(text)?;
    let currency = caps.get(1).map_or("", |m| m.as_str()).trim();
    let digits = caps
        .get(2)
        .map_or("", |m| m.as_str())
        .replace(',', "")
        .trim()
        .to_string();
    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let unit = caps.get(3).map_or("", |m| m.as_str()).trim().to_lowercase();
    Some(ParsedMoney::Parsed {
        currency: currency.to_string(),
        digits,
        unit,
    })
}

/// Reads the one or two numbers held by a digit segment.
///
/// A trailing decimal point (`2840000.`, from a sentence-ending period) is
/// ignored.
pub(crate) fn digit_values(digits: &str) -> Result<Vec<f64>, String> {
    let parts: Vec<&str> = digits.split(RANGE_DASH).collect();
    if parts.len() > 2 {
        return Err(format!("more than one range marker in {:?}", digits));
    }
    parts
        .into_iter()
        .map(|part| {
            let cleaned = part.replace(',', "");
            let cleaned = cleaned.trim().trim_end_matches('.');
            cleaned
                .parse::<f64>()
                .map_err(|_| format!("{:?} is not a number", part.trim()))
        })
        .collect()
}
