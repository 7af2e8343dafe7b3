#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Single-pass summary aggregation.
pub mod aggregate;
/// Constants for column names, vocabularies, sentinels, and defaults.
pub mod constants;
/// Presentation-facing facade over records and filter state.
pub mod dashboard;
/// Columnar decoding behind the `TableDecoder` seam.
pub mod decode;
/// CSV/JSON export and re-import.
pub mod export;
/// Conjunctive record filtering.
pub mod filter;
/// City boundary shapes and the per-city aggregate join.
pub mod geo;
/// Organization identity resolution and grouping.
pub mod identity;
/// Fetch/decode/normalize orchestration and background loads.
pub mod loader;
/// Total row normalization into canonical records.
pub mod normalize;
/// The canonical grant record type.
pub mod record;
/// Shared type aliases.
pub mod types;

mod errors;

pub use aggregate::{Aggregates, CategoryBucket, aggregate};
pub use dashboard::DashboardState;
pub use decode::{ColumnTable, DecoderRuntime, ParquetDecoder, RawRow, TableDecoder};
pub use errors::PipelineError;
pub use filter::{FilterOptions, FilterSpec, GroupBy, apply_filters};
pub use geo::{BoundaryCollection, BoundaryFeature, CityShape, join_city_aggregates};
pub use identity::{IdentityGroup, TopWinners, group_records, is_usable_tax_id, top_winners};
pub use loader::{DataLocation, LoadHandle, LoadState, load_grants};
pub use record::GrantRecord;
