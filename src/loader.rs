//! Load orchestration: fetch bytes, decode, normalize.
//!
//! The load is the only asynchronous and genuinely fallible stage of the
//! pipeline. [`LoadHandle`] runs it on a worker thread and exposes a
//! distinguishable pending/ready/failed state; everything downstream of a
//! successful load is synchronous and total.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Instant;

use tracing::{info, warn};

use crate::decode::{ParquetDecoder, TableDecoder};
use crate::errors::PipelineError;
use crate::normalize::normalize_table;
use crate::record::GrantRecord;

/// Location of an input file, local or remote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataLocation {
    /// Local filesystem path.
    Path(PathBuf),
    /// HTTP(S) URL, fetched once per load.
    Url(String),
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLocation::Path(path) => write!(f, "{}", path.display()),
            DataLocation::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Read the complete byte payload at `location`.
pub fn fetch_bytes(location: &DataLocation) -> Result<Vec<u8>, PipelineError> {
    match location {
        DataLocation::Path(path) => {
            fs::read(path).map_err(|err| PipelineError::SourceUnavailable {
                location: path.display().to_string(),
                reason: format!("failed reading file: {err}"),
            })
        }
        DataLocation::Url(url) => {
            let response =
                ureq::get(url)
                    .call()
                    .map_err(|err| PipelineError::SourceUnavailable {
                        location: url.clone(),
                        reason: format!("request failed: {err}"),
                    })?;
            let mut bytes = Vec::new();
            response
                .into_body()
                .into_reader()
                .read_to_end(&mut bytes)
                .map_err(|err| PipelineError::SourceUnavailable {
                    location: url.clone(),
                    reason: format!("failed reading response body: {err}"),
                })?;
            Ok(bytes)
        }
    }
}

/// Fetch, decode, and normalize the grant dataset at `location`.
///
/// One pass per process: the returned records are the immutable basis for
/// every derived view. Decode failures propagate; normalization cannot
/// fail.
pub fn load_grants(location: &DataLocation) -> Result<Vec<GrantRecord>, PipelineError> {
    let started = Instant::now();
    info!(%location, "loading grant dataset");

    let bytes = fetch_bytes(location)?;
    let decoder = ParquetDecoder::new();
    let table = decoder.decode(bytes)?;
    let records = normalize_table(&table);

    info!(
        rows = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "grant dataset ready"
    );
    Ok(records)
}

/// Observable load lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// The worker thread has not finished yet.
    Pending,
    /// Records are available via [`LoadHandle::wait`].
    Ready,
    /// The load failed; [`LoadHandle::wait`] returns the error.
    Failed,
}

enum LoadSlot {
    Pending,
    Ready(Arc<Vec<GrantRecord>>),
    Failed(String),
}

/// Handle to a dataset load running on a worker thread.
///
/// Cloning the handle shares the same load; all clones observe the same
/// terminal state.
#[derive(Clone)]
pub struct LoadHandle {
    location: String,
    shared: Arc<(Mutex<LoadSlot>, Condvar)>,
}

impl LoadHandle {
    /// Start loading `location` on a background thread.
    pub fn spawn(location: DataLocation) -> Self {
        let shared = Arc::new((Mutex::new(LoadSlot::Pending), Condvar::new()));
        let handle = Self {
            location: location.to_string(),
            shared: shared.clone(),
        };

        thread::spawn(move || {
            let outcome = load_grants(&location);
            let (slot, signal) = &*shared;
            let Ok(mut guard) = slot.lock() else {
                return;
            };
            *guard = match outcome {
                Ok(records) => LoadSlot::Ready(Arc::new(records)),
                Err(err) => {
                    warn!(%location, error = %err, "grant dataset load failed");
                    LoadSlot::Failed(err.to_string())
                }
            };
            signal.notify_all();
        });

        handle
    }

    /// Current lifecycle state without blocking.
    pub fn state(&self) -> LoadState {
        let (slot, _) = &*self.shared;
        match slot.lock() {
            Ok(guard) => match &*guard {
                LoadSlot::Pending => LoadState::Pending,
                LoadSlot::Ready(_) => LoadState::Ready,
                LoadSlot::Failed(_) => LoadState::Failed,
            },
            Err(_) => LoadState::Failed,
        }
    }

    /// Block until the load reaches a terminal state.
    pub fn wait(&self) -> Result<Arc<Vec<GrantRecord>>, PipelineError> {
        let (slot, signal) = &*self.shared;
        let mut guard = slot.lock().map_err(|_| PipelineError::SourceUnavailable {
            location: self.location.clone(),
            reason: "load state lock poisoned".to_string(),
        })?;
        while matches!(*guard, LoadSlot::Pending) {
            guard = signal
                .wait(guard)
                .map_err(|_| PipelineError::SourceUnavailable {
                    location: self.location.clone(),
                    reason: "load state lock poisoned".to_string(),
                })?;
        }
        match &*guard {
            LoadSlot::Ready(records) => Ok(records.clone()),
            LoadSlot::Failed(reason) => Err(PipelineError::SourceUnavailable {
                location: self.location.clone(),
                reason: reason.clone(),
            }),
            LoadSlot::Pending => unreachable!("loop exits only on terminal states"),
        }
    }
}
