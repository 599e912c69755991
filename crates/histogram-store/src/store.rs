//! Load-once access to the histogram volumes.
//!
//! Volumes are loaded lazily on first access and shared read-only for the
//! life of the process. `OnceLock` gives single-flight semantics under
//! concurrent first access; no ad-hoc loaded flags. An absent backing file is
//! "no data", not an error: downstream queries degrade instead of crashing. A
//! file that exists but fails to parse is logged and likewise treated as
//! unavailable, since the serving path must not panic after startup.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;

use crate::config::DataPaths;
use crate::error::Result;
use crate::formats::{HistogramVolumeRecord, SustainedVolumeRecord};
use crate::volume::{HistogramVolume, SustainedWindVolume};

/// Process-wide holder of the strength and sustained-wind volumes.
pub struct HistogramStore {
    paths: DataPaths,
    histograms: OnceLock<Option<Arc<HistogramVolume>>>,
    sustained: OnceLock<Option<Arc<SustainedWindVolume>>>,
}

impl HistogramStore {
    pub fn new(paths: DataPaths) -> Self {
        Self {
            paths,
            histograms: OnceLock::new(),
            sustained: OnceLock::new(),
        }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// The strength-histogram volume, or `None` when unavailable.
    pub fn histograms(&self) -> Option<Arc<HistogramVolume>> {
        self.histograms
            .get_or_init(|| {
                let record =
                    load_record::<HistogramVolumeRecord>(&self.paths.histograms_file)?;
                into_loaded(record.try_into_volume(), &self.paths.histograms_file)
            })
            .clone()
    }

    /// The sustained-wind volume, or `None` when unavailable.
    pub fn sustained(&self) -> Option<Arc<SustainedWindVolume>> {
        self.sustained
            .get_or_init(|| {
                let record = load_record::<SustainedVolumeRecord>(&self.paths.sustained_file)?;
                into_loaded(record.try_into_volume(), &self.paths.sustained_file)
            })
            .clone()
    }
}

fn into_loaded<V>(converted: Result<V>, path: &Path) -> Option<Arc<V>> {
    match converted {
        Ok(volume) => Some(Arc::new(volume)),
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "invalid volume record");
            None
        }
    }
}

/// Read and parse one record file. Absent file → `None`; a parse or shape
/// failure is logged and also yields `None`.
fn load_record<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "volume file absent, feature unavailable");
        return None;
    }
    match read_json::<T>(path) {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to load volume file");
            None
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
