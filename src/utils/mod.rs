use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
pub const DEFAULT_DATE_FORMAT: &str = "%-d/%-m/%Y";
pub const GST_RATE: f64 = 0.1;

/// How monetary values and dates are rendered in every view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayFormat {
    pub currency_symbol: String,
    pub date_format: String,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

pub fn validate_date_format(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("date format is empty".to_string());
    }
    if StrftimeItems::new(value).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid strftime pattern '{value}'"));
    }
    Ok(())
}

/// Parses the timestamp shapes the API emits: RFC 3339, naive ISO date-times,
/// bare dates and epoch milliseconds.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("timestamp is empty".to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(millis) = raw.parse::<i64>() {
        if let Some(dt) = Utc.timestamp_millis_opt(millis).single() {
            return Ok(dt);
        }
    }
    Err(format!("unrecognized timestamp '{raw}'"))
}

/// Short date in the local time zone, like a browser's `toLocaleDateString`.
pub fn format_short_date(value: &str, date_format: &str) -> Result<String, String> {
    let dt = parse_timestamp(value)?;
    let local = dt.with_timezone(&Local);
    let mut out = String::new();
    write!(out, "{}", local.format(date_format))
        .map_err(|_| format!("invalid date format '{date_format}'"))?;
    Ok(out)
}

pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

pub fn format_currency(symbol: &str, amount: f64) -> String {
    format!("{symbol}{}", format_amount(amount))
}

pub fn gst_amount(fare: f64) -> f64 {
    fare * GST_RATE
}

pub fn format_gst(symbol: &str, fare: f64) -> String {
    format!("{symbol}{:.1}", gst_amount(fare))
}

/// Numbers and numeric strings both count; the API is not consistent about which it sends.
/// JSON type name, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => n.as_f64().map(format_amount),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn parse_amount(value: &str) -> Result<f64, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("amount is empty".to_string());
    }
    let amount: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !amount.is_finite() {
        return Err(format!("'{raw}' is not a finite number"));
    }
    if amount < 0.0 {
        return Err("amount must not be negative".to_string());
    }
    Ok(amount)
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = String::with_capacity(value.len());
    out.extend(first.to_uppercase());
    out.push_str(chars.as_str());
    out
}
