//! Presentation-facing facade over the loaded record set.
//!
//! Consumers (tables, charts, the map, export buttons) receive the full
//! normalized record set, the live [`FilterSpec`], and derived views that
//! are recomputed in full on every call. The filter state is only ever
//! replaced as a whole unit, never partially mutated.

use std::sync::Arc;

use crate::aggregate::{Aggregates, aggregate};
use crate::filter::{FilterOptions, FilterSpec, apply_filters};
use crate::identity::{IdentityGroup, TopWinners, group_records, top_winners};
use crate::record::GrantRecord;

/// Records plus current filter state, as consumed by the dashboard shell.
#[derive(Clone, Debug)]
pub struct DashboardState {
    records: Arc<Vec<GrantRecord>>,
    filters: FilterSpec,
}

impl DashboardState {
    /// Wrap a loaded record set with an initial filter state.
    pub fn new(records: impl Into<Arc<Vec<GrantRecord>>>, filters: FilterSpec) -> Self {
        Self {
            records: records.into(),
            filters,
        }
    }

    /// The full normalized record set.
    pub fn records(&self) -> &[GrantRecord] {
        &self.records
    }

    /// The live filter state.
    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    /// Replace the whole filter state.
    pub fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
    }

    /// Reset the filter state to its defaults.
    pub fn reset_filters(&mut self) {
        self.filters = FilterSpec::default();
    }

    /// Records matching the current filter state, in load order.
    pub fn filtered(&self) -> Vec<&GrantRecord> {
        apply_filters(&self.records, &self.filters)
    }

    /// Summary aggregates over the filtered set.
    pub fn aggregates(&self) -> Aggregates {
        aggregate(self.filtered())
    }

    /// Grouped view along `FilterSpec::group_by`, or `None` when grouping
    /// is off.
    pub fn grouped(&self) -> Option<Vec<IdentityGroup>> {
        group_records(self.filtered(), self.filters.group_by)
    }

    /// Resolved-identity top-winners rankings over the filtered set.
    pub fn top_winners(&self) -> TopWinners {
        top_winners(self.filtered())
    }

    /// Distinct values per filterable dimension, from the full record set
    /// so choice controls stay stable while filters narrow the view.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::collect(&self.records)
    }
}
