use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::model::Price;

pub const DATE_NOT_AVAILABLE: &str = "Date not available";
pub const INVALID_DATE: &str = "Invalid Date";
pub const PRICE_NOT_SPECIFIED: &str = "Not specified";

/// `$X.XX` for amounts, the label verbatim otherwise.
pub fn format_price(price: Option<&Price>) -> String {
    match price {
        Some(Price::Amount(amount)) => format!("${amount:.2}"),
        Some(Price::Label(label)) if !label.is_empty() => label.clone(),
        _ => PRICE_NOT_SPECIFIED.to_string(),
    }
}

/// Long-form calendar date, e.g. `March 5, 2025`.
pub fn format_date(date_time: Option<&str>) -> String {
    let Some(raw) = date_time.map(str::trim).filter(|s| !s.is_empty()) else {
        return DATE_NOT_AVAILABLE.to_string();
    };
    match parse_date(raw) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => {
            warn!(date_time = raw, "Encountered an invalid dateTime string");
            INVALID_DATE.to_string()
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
