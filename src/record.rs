use serde::{Deserialize, Serialize};

use crate::types::{Decision, RecordId, TaxId};

/// Canonical grant-application record produced by the normalizer.
///
/// Every field is a defined primitive: missing or malformed source values
/// are replaced by the defaults in [`crate::constants::defaults`] during
/// normalization, so no raw decoded value and no `Option` leaks past the
/// normalizer boundary. Records are immutable after construction; all
/// derived views (filters, aggregates, groups) are pure recomputations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrantRecord {
    /// External application identifier (`proj-{row}` when absent).
    pub id: RecordId,
    /// Applicant organization display name.
    pub organization_name: String,
    /// Tax identifier; may hold "no data" sentinels that identity
    /// resolution treats as absent (see [`crate::identity::is_usable_tax_id`]).
    pub tax_id: TaxId,
    /// Category label; `"Egyéb"` when the source column is absent.
    pub classification: String,
    /// Seat city of the applicant.
    pub city: String,
    /// Seat country; defaults to the dataset's home country.
    pub country: String,
    /// Organization type label.
    pub organization_type: String,
    /// Granted amount in currency units; always finite, `0.0` on parse
    /// failure.
    pub amount: f64,
    /// Normalized decision label (see [`crate::constants::decisions`]).
    pub decision: Decision,
    /// Free-text application subject.
    pub subject: String,
    /// County; empty when not recorded.
    pub county: String,
    /// Region; empty when not recorded.
    pub region: String,
}
