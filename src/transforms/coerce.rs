//! Column type coercion for [`crate::types::DataSet`].
//!
//! Coercion never fails: a value that cannot be read as the target type
//! becomes [`Value::Null`]. Callers that need hard errors for bad
//! configuration (an undeclared column) get them from [`coerce_column`];
//! bad data is not an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::types::{DataSet, Value};

/// Coercion target for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Canonical text form of the value.
    Text,
    /// Whole number via a base-10 prefix parse (`"3.5"` becomes `3`).
    Integer,
    /// Floating point via a longest-numeric-prefix parse.
    Decimal,
    /// Calendar date, re-emitted as canonical `YYYY-MM-DD` text.
    Date,
    /// Boolean from common text spellings, or numeric zero/non-zero.
    Boolean,
}

/// Date formats tried in order. The datetime entry accepts ISO timestamps
/// and keeps only the date part.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y-%m-%dT%H:%M:%S",
];

/// Coerce a single value to `target`.
///
/// Rules:
/// - Missing input (null or blank text) short-circuits to `Null` for every
///   target type.
/// - `Integer` parses an optional sign and then leading digits, stopping at
///   the first non-digit; no digits at all means `Null`.
/// - `Decimal` parses the longest leading numeric run, including one dot
///   and a complete exponent.
/// - `Date` tries each format in [`DATE_FORMATS`] and emits canonical
///   `YYYY-MM-DD` text, so coercing twice is a no-op.
/// - `Boolean` accepts true/yes/1/y and false/no/0/n (any case), then
///   falls back to numeric zero/non-zero.
pub fn coerce_value(value: &Value, target: ColumnType) -> Value {
    if value.is_missing() {
        return Value::Null;
    }

    match target {
        ColumnType::Text => Value::Text(value.text_form().into_owned()),
        ColumnType::Integer => match parse_integer_prefix(value.text_form().trim()) {
            Some(n) => Value::Number(n),
            None => Value::Null,
        },
        ColumnType::Decimal => match parse_decimal_prefix(value.text_form().trim()) {
            Some(n) => Value::Number(n),
            None => Value::Null,
        },
        ColumnType::Date => match parse_date(value.text_form().trim()) {
            Some(date) => Value::Text(date.format("%Y-%m-%d").to_string()),
            None => Value::Null,
        },
        ColumnType::Boolean => coerce_boolean(value),
    }
}

/// Coerce every value of `column` to `target`, returning a fresh dataset.
///
/// Rows without the column keep it absent. Errors only when `column` is not
/// a declared column of the dataset.
pub fn coerce_column(
    dataset: &DataSet,
    column: &str,
    target: ColumnType,
) -> TransformResult<DataSet> {
    if !dataset.has_column(column) {
        return Err(TransformError::UnknownColumn {
            dataset: dataset.id.clone(),
            column: column.to_string(),
        });
    }

    log::debug!(
        "coerce dataset '{}' column '{column}' to {target:?} ({} rows)",
        dataset.id,
        dataset.row_count()
    );

    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            if let Some(value) = row.get(column) {
                out.insert(column, coerce_value(value, target));
            }
            out
        })
        .collect();

    Ok(DataSet::new(dataset.id.clone(), dataset.columns.clone(), rows))
}

/// Base-10 prefix parse: optional sign, then digits until the first
/// non-digit. Digits accumulate into an `f64`, so there is no overflow
/// path (precision degrades past 2^53 instead).
fn parse_integer_prefix(text: &str) -> Option<f64> {
    let mut chars = text.chars().peekable();
    let mut negative = false;

    match chars.peek() {
        Some('+') => {
            chars.next();
        }
        Some('-') => {
            negative = true;
            chars.next();
        }
        _ => {}
    }

    let mut value = 0.0f64;
    let mut saw_digit = false;
    while let Some(digit) = chars.peek().and_then(|ch| ch.to_digit(10)) {
        value = value * 10.0 + f64::from(digit);
        saw_digit = true;
        chars.next();
    }

    if saw_digit {
        Some(if negative { -value } else { value })
    } else {
        None
    }
}

/// Longest-numeric-prefix parse: optional sign, digits with at most one
/// dot, then an exponent only if it is complete (`"1e"` parses as `1`).
fn parse_decimal_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let mut saw_digit = false;
    let mut saw_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                saw_digit = true;
                end += 1;
            }
            b'.' if !saw_dot => {
                saw_dot = true;
                end += 1;
            }
            _ => break,
        }
    }

    if !saw_digit {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && matches!(bytes[cursor], b'+' | b'-') {
            cursor += 1;
        }
        let exponent_digits = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exponent_digits {
            end = cursor;
        }
    }

    text[..end].parse::<f64>().ok()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn coerce_boolean(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Bool(*n != 0.0),
        other => {
            let lowered = other.text_form().trim().to_ascii_lowercase();
            match lowered.as_str() {
                "true" | "yes" | "1" | "y" => Value::Bool(true),
                "false" | "no" | "0" | "n" => Value::Bool(false),
                _ => match other.as_number() {
                    Some(n) => Value::Bool(n != 0.0),
                    None => Value::Null,
                },
            }
        }
    }
}
