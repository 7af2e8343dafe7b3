use std::io;

use thiserror::Error;

/// Error type for data loading, decoding, and serialization failures.
///
/// Decode-time failures are fatal to the pipeline and propagate to the
/// caller; every stage downstream of the normalizer is total and does not
/// produce errors for any input shape the decoder can emit.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed decoding columnar data: {reason}")]
    Decode { reason: String },
    #[error("data source '{location}' is unavailable: {reason}")]
    SourceUnavailable { location: String, reason: String },
    #[error("boundary data error: {0}")]
    Boundary(String),
    #[error("export error: {0}")]
    Export(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
