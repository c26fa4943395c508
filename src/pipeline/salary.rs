//! Numeric salary extraction from free-form compensation text

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HOURLY_MARKER: Regex =
        Regex::new(r"(?i)(?:\bper\s+hour\b|\ban\s+hour\b|/\s*(?:hr|hour)\b|\bhourly\b)")
            .expect("hourly marker pattern");

    /// Retirement plan names such as "401k" or "401(k)" are not amounts
    static ref RETIREMENT_PLAN: Regex =
        Regex::new(r"(?i)\b401\s*\(?k\b\)?").expect("retirement plan pattern");

    /// A number, optionally with separators or decimals, and an optional unit
    /// suffix; a thousands `K` must touch the number and end the word
    static ref AMOUNT: Regex =
        Regex::new(r"(\d[\d,]*(?:\.\d+)?)([kK]\b|\s?%)?").expect("amount pattern");
}

/// Extract one comparable number from salary text
///
/// Hourly compensation, missing text and text without numbers all yield 0.
/// A `K` suffix multiplies by one thousand; percentages are ignored. With
/// several amounts the maximum or minimum is returned per `prefer_higher`.
pub fn extract_salary_value(text: Option<&str>, prefer_higher: bool) -> u64 {
    let Some(text) = text else {
        return 0;
    };

    if HOURLY_MARKER.is_match(text) {
        return 0;
    }

    let text = RETIREMENT_PLAN.replace_all(text, "");
    let amounts = AMOUNT.captures_iter(&text).filter_map(|caps| {
        let suffix = caps.get(2).map(|m| m.as_str().trim_start());
        if suffix == Some("%") {
            return None;
        }

        let digits = caps.get(1)?.as_str().replace(',', "");
        let value: f64 = digits.parse().ok()?;
        let value = match suffix {
            Some("k") | Some("K") => value * 1000.0,
            _ => value,
        };
        Some(value.round() as u64)
    });

    let selected = if prefer_higher {
        amounts.max()
    } else {
        amounts.min()
    };
    selected.unwrap_or(0)
}
