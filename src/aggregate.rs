//! Single-pass summary aggregation over a record set.

use indexmap::IndexMap;

use crate::record::GrantRecord;
use crate::types::CategoryKey;

/// Count and summed amount for one category value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CategoryBucket {
    /// Number of records in the category.
    pub count: usize,
    /// Sum of record amounts in the category.
    pub total_amount: f64,
}

/// Summary statistics over one record set.
///
/// Bucket keys are the raw normalized field values and iterate in first
/// encountered order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregates {
    /// Sum of all record amounts.
    pub total_amount: f64,
    /// Number of records aggregated.
    pub record_count: usize,
    /// `total_amount / record_count`, or `0.0` for an empty set.
    pub average_amount: f64,
    /// Per-city breakdown.
    pub by_city: IndexMap<CategoryKey, CategoryBucket>,
    /// Per-classification breakdown.
    pub by_classification: IndexMap<CategoryKey, CategoryBucket>,
    /// Per-organization-type breakdown.
    pub by_organization_type: IndexMap<CategoryKey, CategoryBucket>,
    /// Per-decision record counts.
    pub by_decision: IndexMap<CategoryKey, usize>,
}

/// Compute [`Aggregates`] in one pass over `records`.
pub fn aggregate<'a, I>(records: I) -> Aggregates
where
    I: IntoIterator<Item = &'a GrantRecord>,
{
    let mut result = Aggregates::default();

    for record in records {
        result.total_amount += record.amount;
        result.record_count += 1;

        let city = result.by_city.entry(record.city.clone()).or_default();
        city.count += 1;
        city.total_amount += record.amount;

        let classification = result
            .by_classification
            .entry(record.classification.clone())
            .or_default();
        classification.count += 1;
        classification.total_amount += record.amount;

        let organization_type = result
            .by_organization_type
            .entry(record.organization_type.clone())
            .or_default();
        organization_type.count += 1;
        organization_type.total_amount += record.amount;

        *result.by_decision.entry(record.decision.clone()).or_default() += 1;
    }

    // Explicit divide-by-zero guard; an empty set averages to 0.
    result.average_amount = if result.record_count > 0 {
        result.total_amount / result.record_count as f64
    } else {
        0.0
    };

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, classification: &str, decision: &str, amount: f64) -> GrantRecord {
        GrantRecord {
            id: format!("{city}-{amount}"),
            organization_name: "Teszt Egyesület".to_string(),
            tax_id: "N/A".to_string(),
            classification: classification.to_string(),
            city: city.to_string(),
            country: "Magyarország".to_string(),
            organization_type: "Egyesület".to_string(),
            amount,
            decision: decision.to_string(),
            subject: String::new(),
            county: String::new(),
            region: String::new(),
        }
    }

    #[test]
    fn empty_set_aggregates_to_zero_without_nan() {
        let empty: Vec<GrantRecord> = Vec::new();
        let result = aggregate(&empty);
        assert_eq!(result.record_count, 0);
        assert_eq!(result.total_amount, 0.0);
        assert_eq!(result.average_amount, 0.0);
        assert!(result.by_city.is_empty());
    }

    #[test]
    fn totals_and_average_accumulate() {
        let records = vec![
            record("Budapest", "Kultúra", "Nyertes", 100.0),
            record("Szeged", "Sport", "Nyertes", 300.0),
        ];
        let result = aggregate(&records);
        assert_eq!(result.record_count, 2);
        assert_eq!(result.total_amount, 400.0);
        assert_eq!(result.average_amount, 200.0);
    }

    #[test]
    fn buckets_partition_the_totals() {
        let records = vec![
            record("Budapest", "Kultúra", "Nyertes", 100.0),
            record("Budapest", "Sport", "Elutasított", 200.0),
            record("Szeged", "Kultúra", "Nyertes", 300.0),
        ];
        let result = aggregate(&records);

        let city_amount: f64 = result.by_city.values().map(|b| b.total_amount).sum();
        let city_count: usize = result.by_city.values().map(|b| b.count).sum();
        assert_eq!(city_amount, result.total_amount);
        assert_eq!(city_count, result.record_count);

        let class_amount: f64 = result
            .by_classification
            .values()
            .map(|b| b.total_amount)
            .sum();
        assert_eq!(class_amount, result.total_amount);

        assert_eq!(result.by_city["Budapest"].count, 2);
        assert_eq!(result.by_city["Budapest"].total_amount, 300.0);
        assert_eq!(result.by_decision["Nyertes"], 2);
        assert_eq!(result.by_decision["Elutasított"], 1);
    }

    #[test]
    fn bucket_keys_keep_first_encounter_order() {
        let records = vec![
            record("Szeged", "Sport", "Nyertes", 1.0),
            record("Budapest", "Kultúra", "Nyertes", 2.0),
            record("Szeged", "Sport", "Nyertes", 3.0),
        ];
        let result = aggregate(&records);
        let cities: Vec<&str> = result.by_city.keys().map(String::as_str).collect();
        assert_eq!(cities, vec!["Szeged", "Budapest"]);
    }
}
