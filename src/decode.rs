//! Columnar decoding behind a narrow seam.
//!
//! Ownership model:
//! - `TableDecoder` is the pipeline-facing interface that turns a raw byte
//!   buffer into a [`ColumnTable`].
//! - `ParquetDecoder` is the shipped implementation, backed by the pure-Rust
//!   `parquet` reader.
//! - `DecoderRuntime` owns the once-only initialization lifecycle, so no
//!   module-level "already initialized" flag exists anywhere.
//!
//! The rest of the pipeline only depends on the row-iteration contract of
//! `ColumnTable`, so the decoder can be swapped for another backend without
//! touching normalization or filtering.

use std::sync::OnceLock;
use std::time::Instant;

use indexmap::IndexMap;
use parquet::file::reader::{FileReader, SerializedFileReader};
use serde_json::Value;
use tracing::debug;

use crate::errors::PipelineError;
use crate::types::FieldName;

/// In-memory column-oriented table decoded from one input file.
///
/// Columns keep the field order of the source schema. Cells are decoded
/// [`serde_json::Value`]s; the normalizer is responsible for coercing them
/// into record primitives.
#[derive(Clone, Debug, Default)]
pub struct ColumnTable {
    columns: IndexMap<FieldName, Vec<Value>>,
    row_count: usize,
}

impl ColumnTable {
    /// Build a table directly from per-field column vectors.
    ///
    /// Shorter columns read as absent (`None`) past their end; the row
    /// count is the longest column's length.
    pub fn from_columns(columns: IndexMap<FieldName, Vec<Value>>) -> Self {
        let row_count = columns.values().map(Vec::len).max().unwrap_or(0);
        Self { columns, row_count }
    }

    /// Total number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Ordered field names, as laid out in the source schema.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Cell value for `field` at `row`, or `None` when either is missing.
    pub fn value(&self, field: &str, row: usize) -> Option<&Value> {
        self.columns.get(field).and_then(|column| column.get(row))
    }

    /// Borrowing row cursor for `index`.
    pub fn row(&self, index: usize) -> RawRow<'_> {
        RawRow { table: self, index }
    }
}

/// One row of a [`ColumnTable`], viewed by field name.
#[derive(Clone, Copy, Debug)]
pub struct RawRow<'a> {
    table: &'a ColumnTable,
    index: usize,
}

impl<'a> RawRow<'a> {
    /// Absolute row index within the table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Decoded cell value for `field`, or `None` when the column is absent.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.table.value(field, self.index)
    }
}

/// Pipeline-facing decoder interface.
pub trait TableDecoder {
    /// Decode a complete in-memory buffer into a column table.
    ///
    /// A malformed or truncated buffer fails with
    /// [`PipelineError::Decode`]; a valid but empty file yields an empty
    /// table. No disk or network side effects.
    fn decode(&self, bytes: Vec<u8>) -> Result<ColumnTable, PipelineError>;
}

/// Once-only decoder initialization lifecycle.
///
/// The pure-Rust parquet backend needs no native runtime, but the lifecycle
/// object is kept so a backend that does (a compiled codec, a wasm module)
/// can slot behind the same seam: construct once, call `ensure_ready`
/// before each decode, and repeated calls stay inert.
#[derive(Debug, Default)]
pub struct DecoderRuntime {
    ready: OnceLock<()>,
}

impl DecoderRuntime {
    /// Initialize the runtime on first call; later calls are no-ops.
    pub fn ensure_ready(&self) -> Result<(), PipelineError> {
        self.ready.get_or_init(|| {
            debug!("columnar decode runtime initialized");
        });
        Ok(())
    }

    /// Whether `ensure_ready` has completed at least once.
    pub fn is_ready(&self) -> bool {
        self.ready.get().is_some()
    }
}

/// Parquet-backed [`TableDecoder`].
#[derive(Debug, Default)]
pub struct ParquetDecoder {
    runtime: DecoderRuntime,
}

impl ParquetDecoder {
    /// Create a decoder with an uninitialized runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// The runtime lifecycle owned by this decoder.
    pub fn runtime(&self) -> &DecoderRuntime {
        &self.runtime
    }
}

impl TableDecoder for ParquetDecoder {
    fn decode(&self, bytes: Vec<u8>) -> Result<ColumnTable, PipelineError> {
        self.runtime.ensure_ready()?;
        let started = Instant::now();

        let reader = SerializedFileReader::new(bytes::Bytes::from(bytes)).map_err(|err| {
            PipelineError::Decode {
                reason: format!("failed reading parquet metadata: {err}"),
            }
        })?;

        let field_names: Vec<FieldName> = reader
            .metadata()
            .file_metadata()
            .schema()
            .get_fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();

        let mut columns: IndexMap<FieldName, Vec<Value>> = field_names
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();

        let rows = reader.get_row_iter(None).map_err(|err| PipelineError::Decode {
            reason: format!("failed iterating parquet rows: {err}"),
        })?;

        let mut row_count = 0usize;
        for row in rows {
            let row = row.map_err(|err| PipelineError::Decode {
                reason: format!("failed reading parquet row {row_count}: {err}"),
            })?;
            let row_value = row.to_json_value();
            let row_object = row_value.as_object();
            for name in &field_names {
                let cell = row_object
                    .and_then(|object| object.get(name))
                    .cloned()
                    .unwrap_or(Value::Null);
                // Columns were pre-seeded from the same field list.
                if let Some(column) = columns.get_mut(name) {
                    column.push(cell);
                }
            }
            row_count += 1;
        }

        debug!(
            rows = row_count,
            fields = field_names.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "decoded columnar table"
        );

        Ok(ColumnTable {
            columns,
            row_count,
        })
    }
}
