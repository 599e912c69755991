//! Wind-speed bin edges and the overlap bin mask.
//!
//! A bin sequence of N+1 strictly increasing edges (knots) defines N
//! half-open bins `[edge[i], edge[i+1])`, with the last bin open-ended. The
//! serialized form replaces the open upper edge with the sentinel value 100,
//! since JSON cannot carry infinity; query-side, any bound at or above the
//! sentinel is treated as unbounded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wind speeds at or above this value (knots) stand in for "unbounded".
pub const INFINITY_SENTINEL_KNOTS: f64 = 100.0;

/// Errors raised when constructing bin edges from persisted data.
#[derive(Error, Debug)]
pub enum BinEdgesError {
    /// Fewer than two edges, so no bin can be formed.
    #[error("bin edges need at least 2 entries, got {0}")]
    TooFew(usize),

    /// Edges are not strictly increasing.
    #[error("bin edges must be strictly increasing at position {0}")]
    NotIncreasing(usize),

    /// First edge is not zero.
    #[error("first bin edge must be 0, got {0}")]
    NonZeroFirstEdge(f64),
}

/// Validated wind-speed bin edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindBinEdges {
    edges: Vec<f64>,
}

impl WindBinEdges {
    /// Build from raw edges. The last edge may be `f64::INFINITY` or the
    /// sentinel value; anything at or above the sentinel is widened to
    /// infinity so the last bin is open-ended.
    pub fn new(edges: Vec<f64>) -> Result<Self, BinEdgesError> {
        if edges.len() < 2 {
            return Err(BinEdgesError::TooFew(edges.len()));
        }
        if edges[0] != 0.0 {
            return Err(BinEdgesError::NonZeroFirstEdge(edges[0]));
        }
        let mut edges = edges;
        let last = edges.len() - 1;
        if edges[last] >= INFINITY_SENTINEL_KNOTS {
            edges[last] = f64::INFINITY;
        }
        for i in 1..edges.len() {
            if edges[i] <= edges[i - 1] {
                return Err(BinEdgesError::NotIncreasing(i));
            }
        }
        Ok(Self { edges })
    }

    /// Number of bins (one fewer than the number of edges).
    pub fn num_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// The raw edges, with an infinite last edge when open-ended.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Lower edge of bin `i`.
    pub fn low(&self, i: usize) -> f64 {
        self.edges[i]
    }

    /// Upper edge of bin `i` (infinite for the last bin when open-ended).
    pub fn high(&self, i: usize) -> f64 {
        self.edges[i + 1]
    }

    /// Edges with infinity replaced by the sentinel, for serialization.
    pub fn sanitized(&self) -> Vec<f64> {
        self.edges
            .iter()
            .map(|&e| {
                if e.is_infinite() {
                    INFINITY_SENTINEL_KNOTS
                } else {
                    e
                }
            })
            .collect()
    }

    /// Select every bin that overlaps the query range `[wind_min, wind_max]`.
    ///
    /// Bin `[low, high)` is selected iff `low < wind_max && high > wind_min`.
    /// A bin only partially inside the range still counts fully; the answer
    /// is approximate at bin-width granularity. `wind_max` at or above the
    /// sentinel is treated as unbounded.
    pub fn overlap_mask(&self, wind_min: f64, wind_max: f64) -> Vec<bool> {
        let wind_max = if wind_max >= INFINITY_SENTINEL_KNOTS {
            f64::INFINITY
        } else {
            wind_max
        };
        (0..self.num_bins())
            .map(|i| self.low(i) < wind_max && self.high(i) > wind_min)
            .collect()
    }

    /// Index of the bin containing `value` (`low ≤ value < high`), or `None`
    /// for negative values. The open last bin catches everything above the
    /// final finite edge.
    pub fn bin_containing(&self, value: f64) -> Option<usize> {
        if value < 0.0 {
            return None;
        }
        Some(
            (0..self.num_bins())
                .find(|&i| value < self.high(i))
                .unwrap_or(self.num_bins() - 1),
        )
    }

    /// Index of the first bin whose lower edge is at or above `threshold`,
    /// or `num_bins()` when no bin qualifies. Summing counts from this index
    /// onward gives "at or above threshold".
    pub fn first_bin_at_or_above(&self, threshold: f64) -> usize {
        (0..self.num_bins())
            .find(|&i| self.low(i) >= threshold)
            .unwrap_or_else(|| self.num_bins())
    }
}
