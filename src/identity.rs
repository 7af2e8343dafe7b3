//! Organization identity resolution and record grouping.
//!
//! Two grouping policies exist and they are intentionally different:
//!
//! - [`group_records`] with [`GroupBy::Organization`] keys on the exact
//!   name + tax-ID pair: two records belong to one group only when both
//!   fields match.
//! - [`top_winners`] resolves a fuzzy identity: a usable tax ID wins,
//!   otherwise the organization name. "No data" sentinel tax IDs must not
//!   become group keys — two unrelated organizations that both report
//!   `nincs adat` are distinct groups.
//!
//! The sentinel check lives in exactly one predicate,
//! [`is_usable_tax_id`]; every identity call site goes through it.

use indexmap::IndexMap;

use crate::constants::{defaults, identity};
use crate::filter::GroupBy;
use crate::record::GrantRecord;
use crate::types::{GroupKey, TaxId};

/// Whether a tax-ID field holds an actual identifier.
///
/// Trimmed, case-insensitive comparison against the "no data" sentinel set
/// plus the empty string. The input is the normalized record field, so
/// tax IDs that arrived as numbers in the source file have already been
/// coerced to their text form and compare like any other value.
pub fn is_usable_tax_id(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    !normalized.is_empty()
        && !identity::NO_DATA_TAX_IDS
            .iter()
            .any(|sentinel| *sentinel == normalized)
}

/// One group of records collapsed under a resolved identity key.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityGroup {
    /// Resolved group key.
    pub key: GroupKey,
    /// Display name taken from the first record seen in the group.
    pub name: String,
    /// Tax ID, present only when the key was tax-ID-derived.
    pub tax_id: Option<TaxId>,
    /// Number of records in the group.
    pub count: usize,
    /// Summed amount across the group's records.
    pub total_amount: f64,
}

/// Ranked top-winners views over the same identity groups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopWinners {
    /// Groups sorted descending by summed amount, top 50.
    pub by_amount: Vec<IdentityGroup>,
    /// Groups sorted descending by record count, top 50.
    pub by_count: Vec<IdentityGroup>,
}

fn display_name(record: &GrantRecord) -> String {
    if record.organization_name.is_empty() {
        defaults::UNNAMED_ORGANIZATION.to_string()
    } else {
        record.organization_name.clone()
    }
}

fn accumulate(
    groups: &mut IndexMap<GroupKey, IdentityGroup>,
    key: GroupKey,
    name: String,
    tax_id: Option<TaxId>,
    record: &GrantRecord,
) {
    let entry = groups.entry(key.clone()).or_insert_with(|| IdentityGroup {
        key,
        name,
        tax_id,
        count: 0,
        total_amount: 0.0,
    });
    entry.count += 1;
    entry.total_amount += record.amount;
}

fn sorted_by_amount(mut groups: Vec<IdentityGroup>) -> Vec<IdentityGroup> {
    // Stable sort: ties keep first-encountered order. Amounts are finite
    // by the normalizer contract, so total_cmp imposes the plain numeric
    // order.
    groups.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    groups
}

/// Collapse records into top-winners groups under the resolved-identity
/// policy.
///
/// Key = tax ID when [`is_usable_tax_id`], otherwise the organization
/// name; records resolving to an empty key are skipped. Both ranked views
/// are derived from the same groups and truncated to the top 50.
pub fn top_winners<'a, I>(records: I) -> TopWinners
where
    I: IntoIterator<Item = &'a GrantRecord>,
{
    let mut groups: IndexMap<GroupKey, IdentityGroup> = IndexMap::new();

    for record in records {
        let (key, tax_id) = if is_usable_tax_id(&record.tax_id) {
            (record.tax_id.clone(), Some(record.tax_id.clone()))
        } else {
            (record.organization_name.clone(), None)
        };
        if key.is_empty() {
            continue;
        }
        accumulate(&mut groups, key, display_name(record), tax_id, record);
    }

    let all: Vec<IdentityGroup> = groups.into_values().collect();

    let by_amount = {
        let mut view = sorted_by_amount(all.clone());
        view.truncate(identity::TOP_GROUP_LIMIT);
        view
    };
    let by_count = {
        let mut view = all;
        view.sort_by(|a, b| b.count.cmp(&a.count));
        view.truncate(identity::TOP_GROUP_LIMIT);
        view
    };

    TopWinners {
        by_amount,
        by_count,
    }
}

/// Group records along the selected dimension.
///
/// `GroupBy::Organization` keys on the exact `"{name}-{tax_id}"` pair; the
/// other dimensions key on the normalized field value directly. The full
/// group set is returned sorted descending by summed amount, stable on
/// ties, without truncation. `GroupBy::None` yields `None`.
pub fn group_records<'a, I>(records: I, group_by: GroupBy) -> Option<Vec<IdentityGroup>>
where
    I: IntoIterator<Item = &'a GrantRecord>,
{
    if group_by == GroupBy::None {
        return None;
    }

    let mut groups: IndexMap<GroupKey, IdentityGroup> = IndexMap::new();

    for record in records {
        let (key, name, tax_id) = match group_by {
            GroupBy::Organization => (
                format!("{}-{}", record.organization_name, record.tax_id),
                record.organization_name.clone(),
                Some(record.tax_id.clone()),
            ),
            GroupBy::City => (record.city.clone(), record.city.clone(), None),
            GroupBy::Classification => (
                record.classification.clone(),
                record.classification.clone(),
                None,
            ),
            GroupBy::OrganizationType => (
                record.organization_type.clone(),
                record.organization_type.clone(),
                None,
            ),
            GroupBy::Decision => (record.decision.clone(), record.decision.clone(), None),
            GroupBy::None => unreachable!("handled above"),
        };
        accumulate(&mut groups, key, name, tax_id, record);
    }

    Some(sorted_by_amount(groups.into_values().collect()))
}
