//! Conjunctive record filtering and filter-control metadata.

use serde::{Deserialize, Serialize};

use crate::record::GrantRecord;

/// Grouping dimension selected by the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    /// No grouping; records render individually.
    #[default]
    None,
    /// Group by exact organization identity (name and tax ID both match).
    Organization,
    /// Group by seat city.
    City,
    /// Group by classification label.
    Classification,
    /// Group by organization type.
    OrganizationType,
    /// Group by normalized decision.
    Decision,
}

/// Active filter state, replaced as a whole unit on every change.
///
/// Values within one category are OR-ed; categories are AND-ed. An empty
/// category `Vec` means "no constraint on this dimension", never "exclude
/// everything".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring query across the searchable text fields.
    pub search_text: String,
    /// Accepted decision labels.
    pub decisions: Vec<String>,
    /// Accepted seat cities.
    pub cities: Vec<String>,
    /// Accepted classification labels.
    pub classifications: Vec<String>,
    /// Accepted organization types.
    pub organization_types: Vec<String>,
    /// Inclusive lower amount bound.
    pub min_amount: f64,
    /// Inclusive upper amount bound; `None` is unbounded.
    pub max_amount: Option<f64>,
    /// Grouping dimension for the grouped record view.
    pub group_by: GroupBy,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            decisions: Vec::new(),
            cities: Vec::new(),
            classifications: Vec::new(),
            organization_types: Vec::new(),
            min_amount: 0.0,
            max_amount: None,
            group_by: GroupBy::None,
        }
    }
}

/// Whether `record` passes every active predicate of `spec`.
///
/// The cheap exact-match predicates run before the substring scan; the
/// result is order-independent since all predicates are AND-ed.
pub fn matches_filters(record: &GrantRecord, spec: &FilterSpec) -> bool {
    if !spec.decisions.is_empty() && !spec.decisions.contains(&record.decision) {
        return false;
    }
    if !spec.cities.is_empty() && !spec.cities.contains(&record.city) {
        return false;
    }
    if !spec.classifications.is_empty() && !spec.classifications.contains(&record.classification) {
        return false;
    }
    if !spec.organization_types.is_empty()
        && !spec.organization_types.contains(&record.organization_type)
    {
        return false;
    }
    if record.amount < spec.min_amount {
        return false;
    }
    if spec.max_amount.is_some_and(|max| record.amount > max) {
        return false;
    }
    if !spec.search_text.is_empty() {
        let query = spec.search_text.to_lowercase();
        let haystacks = [
            record.subject.as_str(),
            record.organization_name.as_str(),
            record.tax_id.as_str(),
            record.city.as_str(),
            record.id.as_str(),
            record.classification.as_str(),
        ];
        if !haystacks
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
        {
            return false;
        }
    }
    true
}

/// Filter `records` by `spec`, preserving input order.
pub fn apply_filters<'a>(records: &'a [GrantRecord], spec: &FilterSpec) -> Vec<&'a GrantRecord> {
    records
        .iter()
        .filter(|record| matches_filters(record, spec))
        .collect()
}

/// Distinct values per filterable dimension, for populating choice controls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOptions {
    /// Distinct seat cities, sorted, without empty values.
    pub cities: Vec<String>,
    /// Distinct classification labels, sorted, without empty values.
    pub classifications: Vec<String>,
    /// Distinct decision labels, sorted, without empty values.
    pub decisions: Vec<String>,
    /// Distinct organization types, sorted, without empty values.
    pub organization_types: Vec<String>,
}

impl FilterOptions {
    /// Collect the distinct-value lists from the full record set.
    pub fn collect(records: &[GrantRecord]) -> Self {
        Self {
            cities: distinct(records, |record| &record.city),
            classifications: distinct(records, |record| &record.classification),
            decisions: distinct(records, |record| &record.decision),
            organization_types: distinct(records, |record| &record.organization_type),
        }
    }
}

fn distinct(records: &[GrantRecord], field: impl Fn(&GrantRecord) -> &String) -> Vec<String> {
    let mut values: Vec<String> = records
        .iter()
        .map(field)
        .filter(|value| !value.is_empty())
        .cloned()
        .collect();
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, city: &str, decision: &str, amount: f64) -> GrantRecord {
        GrantRecord {
            id: id.to_string(),
            organization_name: format!("{id} szervezet"),
            tax_id: "N/A".to_string(),
            classification: "Egyéb".to_string(),
            city: city.to_string(),
            country: "Magyarország".to_string(),
            organization_type: "Egyesület".to_string(),
            amount,
            decision: decision.to_string(),
            subject: format!("{id} program"),
            county: String::new(),
            region: String::new(),
        }
    }

    #[test]
    fn empty_spec_is_identity() {
        let records = vec![
            record("a", "Budapest", "Nyertes", 100.0),
            record("b", "Szeged", "Elutasított", 200.0),
        ];
        let filtered = apply_filters(&records, &FilterSpec::default());
        assert_eq!(filtered.len(), records.len());
    }

    #[test]
    fn category_filters_keep_members_only() {
        let records = vec![
            record("a", "Budapest", "Nyertes", 100.0),
            record("b", "Szeged", "Elutasított", 200.0),
            record("c", "Budapest", "Elutasított", 300.0),
        ];
        let spec = FilterSpec {
            cities: vec!["Budapest".to_string()],
            ..FilterSpec::default()
        };
        let filtered = apply_filters(&records, &spec);
        assert!(filtered.iter().all(|r| r.city == "Budapest"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn categories_are_conjunctive() {
        let records = vec![
            record("a", "Budapest", "Nyertes", 100.0),
            record("b", "Budapest", "Elutasított", 200.0),
        ];
        let spec = FilterSpec {
            cities: vec!["Budapest".to_string()],
            decisions: vec!["Nyertes".to_string()],
            ..FilterSpec::default()
        };
        let filtered = apply_filters(&records, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn amount_bounds_are_inclusive() {
        let records = vec![
            record("low", "Budapest", "Nyertes", 100.0),
            record("mid", "Budapest", "Nyertes", 200.0),
            record("high", "Budapest", "Nyertes", 300.0),
        ];
        let spec = FilterSpec {
            min_amount: 200.0,
            max_amount: Some(200.0),
            ..FilterSpec::default()
        };
        let filtered = apply_filters(&records, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "mid");

        let unbounded = FilterSpec {
            min_amount: 200.0,
            ..FilterSpec::default()
        };
        assert_eq!(apply_filters(&records, &unbounded).len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_across_text_fields() {
        let mut records = vec![
            record("a", "Budapest", "Nyertes", 100.0),
            record("b", "Szeged", "Nyertes", 200.0),
        ];
        records[1].subject = "Közösségi tánc program".to_string();

        let by_city = FilterSpec {
            search_text: "budapest".to_string(),
            ..FilterSpec::default()
        };
        assert_eq!(apply_filters(&records, &by_city).len(), 1);

        let by_subject = FilterSpec {
            search_text: "TÁNC".to_string(),
            ..FilterSpec::default()
        };
        let hits = apply_filters(&records, &by_subject);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }

    #[test]
    fn no_match_yields_empty_set_not_error() {
        let records = vec![record("a", "Budapest", "Nyertes", 100.0)];
        let spec = FilterSpec {
            search_text: "nincs ilyen".to_string(),
            ..FilterSpec::default()
        };
        assert!(apply_filters(&records, &spec).is_empty());
    }

    #[test]
    fn filtering_preserves_order() {
        let records = vec![
            record("c", "Budapest", "Nyertes", 1.0),
            record("a", "Budapest", "Nyertes", 2.0),
            record("b", "Budapest", "Nyertes", 3.0),
        ];
        let filtered = apply_filters(&records, &FilterSpec::default());
        let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn filter_options_are_sorted_deduped_and_nonempty() {
        let records = vec![
            record("a", "Szeged", "Nyertes", 1.0),
            record("b", "Budapest", "Nyertes", 2.0),
            record("c", "Szeged", "Elutasított", 3.0),
            record("d", "", "Nyertes", 4.0),
        ];

        let options = FilterOptions::collect(&records);
        assert_eq!(options.cities, vec!["Budapest", "Szeged"]);
        assert_eq!(options.decisions, vec!["Elutasított", "Nyertes"]);
    }
}
