//! Field normalization from decoded cells into canonical records.
//!
//! Every function here is total: corrupt or missing fields degrade to the
//! documented defaults instead of aborting the load. No code path past the
//! decoder may fail for any value shape the decoder can produce.

use rayon::prelude::*;
use serde_json::Value;

use crate::constants::{columns, decisions, defaults};
use crate::decode::{ColumnTable, RawRow};
use crate::record::GrantRecord;

/// Coerce a decoded cell into display text.
///
/// `Null` reads as absent so callers can substitute their field default.
/// Integral numbers format without a trailing `.0` — source files have
/// shipped tax IDs as numeric columns, and the identity key for such a
/// record must equal the text form of the same ID.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number_to_text(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

fn number_to_text(number: &serde_json::Number) -> String {
    if let Some(value) = number.as_i64() {
        return value.to_string();
    }
    if let Some(value) = number.as_u64() {
        return value.to_string();
    }
    match number.as_f64() {
        // Whole doubles print as integers, matching the text form.
        Some(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 9e15 => {
            format!("{}", value as i64)
        }
        Some(value) => value.to_string(),
        None => number.to_string(),
    }
}

/// Parse an amount cell into a finite `f64`.
///
/// Numeric cells pass through; text cells go through
/// [`parse_locale_number`]. Anything else reads as `0.0`.
pub fn parse_amount(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number
            .as_f64()
            .filter(|parsed| parsed.is_finite())
            .unwrap_or(0.0),
        Some(Value::String(text)) => parse_locale_number(text),
        _ => 0.0,
    }
}

/// Parse a locale-formatted amount string (`"2 886 200"`, `"1,5"`).
///
/// All whitespace (the thousands separator) is stripped and commas become
/// decimal points before parsing. When the whole cleaned string does not
/// parse, the longest leading numeric prefix is used instead; empty or
/// fully unparsable input yields `0.0`. Never returns NaN or an infinity.
pub fn parse_locale_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    let parsed = cleaned
        .parse::<f64>()
        .ok()
        .or_else(|| leading_number(&cleaned));
    match parsed {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let mut end = 0usize;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (pos, byte) in text.bytes().enumerate() {
        match byte {
            b'+' | b'-' if pos == 0 => end = pos + 1,
            b'0'..=b'9' => {
                end = pos + 1;
                seen_digit = true;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end = pos + 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    text[..end].parse::<f64>().ok()
}

/// Normalize a decision label into the fixed vocabulary.
///
/// Trim + lowercase, then the exact canonical table; any other non-empty
/// value keeps only its first character capitalized; empty or absent input
/// maps to the `"Ismeretlen"` sentinel. Total and idempotent — downstream
/// status filtering and coloring depend on this mapping being exact.
pub fn normalize_decision(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return decisions::UNKNOWN.to_string();
    }
    for (source, canonical) in decisions::CANONICAL {
        if lower == source {
            return canonical.to_string();
        }
    }
    capitalize_first(&lower)
}

fn capitalize_first(lower: &str) -> String {
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn text_or(row: &RawRow<'_>, field: &str, default: &str) -> String {
    row.get(field)
        .and_then(value_to_text)
        .unwrap_or_else(|| default.to_string())
}

/// Map one decoded row into a [`GrantRecord`]. Never fails.
pub fn normalize_row(index: usize, row: &RawRow<'_>) -> GrantRecord {
    // Legacy file revisions only carry the misspelled subject column, so it
    // is consulted before the canonical spelling.
    let subject = row
        .get(columns::SUBJECT_LEGACY)
        .and_then(value_to_text)
        .or_else(|| row.get(columns::SUBJECT).and_then(value_to_text))
        .unwrap_or_default();

    GrantRecord {
        id: row
            .get(columns::ID)
            .and_then(value_to_text)
            .unwrap_or_else(|| format!("{}{index}", defaults::SYNTHETIC_ID_PREFIX)),
        organization_name: text_or(row, columns::ORGANIZATION_NAME, defaults::NOT_AVAILABLE),
        tax_id: text_or(row, columns::TAX_ID, defaults::NOT_AVAILABLE),
        classification: text_or(row, columns::CLASSIFICATION, defaults::CLASSIFICATION_OTHER),
        city: text_or(row, columns::CITY, defaults::NOT_AVAILABLE),
        country: text_or(row, columns::COUNTRY, defaults::HOME_COUNTRY),
        organization_type: text_or(row, columns::ORGANIZATION_TYPE, defaults::NOT_AVAILABLE),
        amount: parse_amount(row.get(columns::AMOUNT)),
        decision: normalize_decision(&text_or(row, columns::DECISION, "")),
        subject,
        county: text_or(row, columns::COUNTY, ""),
        region: text_or(row, columns::REGION, ""),
    }
}

/// Normalize every row of a decoded table, preserving row order.
///
/// Rows are independent, so the pass runs in parallel; the indexed collect
/// keeps the output order equal to the table order.
pub fn normalize_table(table: &ColumnTable) -> Vec<GrantRecord> {
    (0..table.row_count())
        .into_par_iter()
        .map(|index| normalize_row(index, &table.row(index)))
        .collect()
}
