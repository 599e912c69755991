//! Error types for the statistics engines.
//!
//! Expected missing-data conditions are variants here, not panics: callers at
//! the transport boundary map `SpotNotFound` to a 404-equivalent and must be
//! able to tell `NoObservations` apart from a valid 0% answer.

use thiserror::Error;

/// Errors returned by the query engines.
#[derive(Error, Debug)]
pub enum StatsError {
    /// The spot id has no entry in the spot table or no histogram row.
    #[error("spot not found: {0}")]
    SpotNotFound(String),

    /// Histogram data exists, but the selected date range has zero total
    /// observations. Distinct from a 0% answer.
    #[error("no observations in the selected date range")]
    NoObservations,

    /// The strength-histogram volume failed to load or is absent.
    #[error("histogram volume is not available")]
    HistogramsUnavailable,

    /// The sustained-wind volume is absent; sustained queries are degraded.
    #[error("sustained-wind volume is not available")]
    SustainedUnavailable,

    /// The per-spot wind-rose file is absent.
    #[error("wind rose data is not available for spot {0}")]
    WindRoseUnavailable(String),

    /// Underlying storage failure.
    #[error(transparent)]
    Store(#[from] histogram_store::StoreError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, StatsError>;
