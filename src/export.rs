//! Flat-text serialization of record subsets.
//!
//! The delimited-text format covers every record field in a fixed column
//! order. A field containing the delimiter, a quote, or a line break is
//! wrapped in quotes with embedded quotes doubled; [`from_csv`] inverts
//! [`to_csv`] exactly, which the round-trip tests rely on.

use crate::constants::export::{DELIMITER, HEADERS, QUOTE};
use crate::errors::PipelineError;
use crate::record::GrantRecord;

fn escape_field(field: &str) -> String {
    let needs_quoting = field.contains(DELIMITER)
        || field.contains(QUOTE)
        || field.contains('\n')
        || field.contains('\r');
    if !needs_quoting {
        return field.to_string();
    }
    let doubled = field.replace(QUOTE, "\"\"");
    format!("{QUOTE}{doubled}{QUOTE}")
}

fn record_fields(record: &GrantRecord) -> [String; 12] {
    [
        record.id.clone(),
        record.organization_name.clone(),
        record.tax_id.clone(),
        record.classification.clone(),
        record.city.clone(),
        record.country.clone(),
        record.organization_type.clone(),
        record.amount.to_string(),
        record.decision.clone(),
        record.subject.clone(),
        record.county.clone(),
        record.region.clone(),
    ]
}

/// Serialize records as delimited text with a header row.
pub fn to_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a GrantRecord>,
{
    let mut lines = vec![HEADERS.join(&DELIMITER.to_string())];
    for record in records {
        let fields = record_fields(record);
        let escaped: Vec<String> = fields.iter().map(|field| escape_field(field)).collect();
        lines.push(escaped.join(&DELIMITER.to_string()));
    }
    lines.join("\n")
}

/// Serialize records as a pretty-printed JSON array of full records.
pub fn to_json<'a, I>(records: I) -> Result<String, PipelineError>
where
    I: IntoIterator<Item = &'a GrantRecord>,
{
    let collected: Vec<&GrantRecord> = records.into_iter().collect();
    serde_json::to_string_pretty(&collected)
        .map_err(|err| PipelineError::Export(format!("failed encoding JSON export: {err}")))
}

/// Re-import delimited text produced by [`to_csv`].
pub fn from_csv(text: &str) -> Result<Vec<GrantRecord>, PipelineError> {
    let mut rows = parse_rows(text)?;
    if rows.is_empty() {
        return Err(PipelineError::Export("missing header row".to_string()));
    }
    let header = rows.remove(0);
    if header != HEADERS {
        return Err(PipelineError::Export(format!(
            "unexpected header row: {header:?}"
        )));
    }

    rows.into_iter()
        .enumerate()
        .map(|(line, row)| {
            let [id, organization_name, tax_id, classification, city, country, organization_type, amount, decision, subject, county, region]: [String; 12] =
                row.try_into().map_err(|row: Vec<String>| {
                    PipelineError::Export(format!(
                        "row {} has {} fields, expected {}",
                        line + 1,
                        row.len(),
                        HEADERS.len()
                    ))
                })?;
            let amount = amount.parse::<f64>().map_err(|err| {
                PipelineError::Export(format!("row {} has invalid amount '{amount}': {err}", line + 1))
            })?;
            Ok(GrantRecord {
                id,
                organization_name,
                tax_id,
                classification,
                city,
                country,
                organization_type,
                amount,
                decision,
                subject,
                county,
                region,
            })
        })
        .collect()
}

fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, PipelineError> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }
        match ch {
            q if q == QUOTE && field.is_empty() => in_quotes = true,
            d if d == DELIMITER => row.push(std::mem::take(&mut field)),
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\r' => {}
            other => field.push(other),
        }
    }

    if in_quotes {
        return Err(PipelineError::Export(
            "unterminated quoted field".to_string(),
        ));
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, subject: &str, amount: f64) -> GrantRecord {
        GrantRecord {
            id: "NEAO-1".to_string(),
            organization_name: name.to_string(),
            tax_id: "12345678".to_string(),
            classification: "Kultúra".to_string(),
            city: "Budapest".to_string(),
            country: "Magyarország".to_string(),
            organization_type: "Egyesület".to_string(),
            amount,
            decision: "Nyertes".to_string(),
            subject: subject.to_string(),
            county: "Pest".to_string(),
            region: String::new(),
        }
    }

    #[test]
    fn plain_fields_export_unquoted() {
        let records = vec![record("Teszt Egyesület", "Tábor", 1500.0)];
        let csv = to_csv(&records);
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("Azonosító,"));
        let row = lines.next().unwrap();
        assert!(row.contains("Teszt Egyesület,12345678"));
        assert!(!row.contains('"'));
    }

    #[test]
    fn special_characters_are_quoted_and_doubled() {
        let records = vec![record("\"Kör\" Egyesület, Pécs", "több\nsoros", 1.5)];
        let csv = to_csv(&records);
        assert!(csv.contains("\"\"\"Kör\"\" Egyesület, Pécs\""));
        assert!(csv.contains("\"több\nsoros\""));
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let records = vec![
            record("\"Kör\" Egyesület, Pécs", "sor1\nsor2, vessző", 2_886_200.0),
            record("Sima Szervezet", "", 1.5),
        ];
        let reparsed = from_csv(&to_csv(&records)).unwrap();
        assert_eq!(reparsed, records);
    }

    #[test]
    fn malformed_rows_surface_export_errors() {
        assert!(matches!(
            from_csv("").unwrap_err(),
            PipelineError::Export(_)
        ));

        let wrong_header = "a,b\n1,2";
        assert!(matches!(
            from_csv(wrong_header).unwrap_err(),
            PipelineError::Export(_)
        ));

        let short_row = format!("{}\nonly,three,fields", HEADERS.join(","));
        assert!(matches!(
            from_csv(&short_row).unwrap_err(),
            PipelineError::Export(_)
        ));
    }

    #[test]
    fn json_export_contains_full_records() {
        let records = vec![record("Teszt", "Tárgy", 42.0)];
        let json = to_json(&records).unwrap();
        let parsed: Vec<GrantRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }
}
