//! Data-file locations and cache sizing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Locations of the persisted ETL output plus cache bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory; the individual file defaults hang off this.
    pub data_dir: PathBuf,

    /// The single 3D strength-histogram volume file.
    pub histograms_file: PathBuf,

    /// The sustained-wind volume file (optional enrichment).
    pub sustained_file: PathBuf,

    /// The spot metadata table.
    pub spots_file: PathBuf,

    /// Directory of per-spot 2D wind-rose files, one `<spot_id>.json` each.
    pub windrose_dir: PathBuf,

    /// Maximum number of per-spot wind-rose files held in memory.
    pub windrose_cache_size: usize,
}

impl Default for DataPaths {
    fn default() -> Self {
        let data_dir = PathBuf::from("data/processed");
        Self {
            histograms_file: data_dir.join("histograms_1d.json"),
            sustained_file: data_dir.join("sustained_wind.json"),
            spots_file: data_dir.join("spots.json"),
            windrose_dir: data_dir.join("histograms_2d"),
            windrose_cache_size: 128,
            data_dir,
        }
    }
}

impl DataPaths {
    /// Build paths rooted at a specific data directory.
    pub fn rooted_at(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            histograms_file: data_dir.join("histograms_1d.json"),
            sustained_file: data_dir.join("sustained_wind.json"),
            spots_file: data_dir.join("spots.json"),
            windrose_dir: data_dir.join("histograms_2d"),
            windrose_cache_size: 128,
            data_dir,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut paths = match std::env::var("WIND_DATA_DIR") {
            Ok(dir) => Self::rooted_at(dir),
            Err(_) => Self::default(),
        };

        if let Ok(val) = std::env::var("WIND_HISTOGRAMS_FILE") {
            paths.histograms_file = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("WIND_SUSTAINED_FILE") {
            paths.sustained_file = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("WIND_SPOTS_FILE") {
            paths.spots_file = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("WIND_WINDROSE_DIR") {
            paths.windrose_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("WIND_WINDROSE_CACHE_SIZE") {
            if let Ok(size) = val.parse() {
                paths.windrose_cache_size = size;
            }
        }

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.windrose_cache_size == 0 {
            return Err("windrose_cache_size must be > 0".to_string());
        }
        Ok(())
    }

    /// Path of the wind-rose file for one spot.
    pub fn windrose_file(&self, spot_id: &str) -> PathBuf {
        self.windrose_dir.join(format!("{spot_id}.json"))
    }
}
