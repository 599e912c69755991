//! Spot metadata table as parallel arrays.
//!
//! The table is loaded once and kept as index-aligned columns so the filter
//! path can build boolean masks over the whole fleet without touching
//! per-row structs. Records are reconstructed only for the rows that survive
//! filtering.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::formats::{SpotRecord, SpotTableRecord};

/// Immutable spot metadata, columnar.
#[derive(Debug)]
pub struct SpotTable {
    ids: Vec<String>,
    names: Vec<String>,
    names_lower: Vec<String>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    countries: Vec<Option<String>>,
    id_to_index: HashMap<String, usize>,
}

impl SpotTable {
    /// Load the table from its persisted record file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let record: SpotTableRecord = serde_json::from_reader(BufReader::new(file))?;
        let table = Self::from_records(record.spots);
        tracing::info!(path = %path.display(), spots = table.len(), "loaded spot table");
        Ok(table)
    }

    /// Build the columnar table from row records.
    pub fn from_records(records: Vec<SpotRecord>) -> Self {
        let mut ids = Vec::with_capacity(records.len());
        let mut names = Vec::with_capacity(records.len());
        let mut names_lower = Vec::with_capacity(records.len());
        let mut latitudes = Vec::with_capacity(records.len());
        let mut longitudes = Vec::with_capacity(records.len());
        let mut countries = Vec::with_capacity(records.len());

        for record in records {
            names_lower.push(record.name.to_lowercase());
            ids.push(record.spot_id);
            names.push(record.name);
            latitudes.push(record.latitude);
            longitudes.push(record.longitude);
            countries.push(record.country);
        }

        let id_to_index = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        Self {
            ids,
            names,
            names_lower,
            latitudes,
            longitudes,
            countries,
            id_to_index,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Row index for a spot id.
    pub fn index_of(&self, spot_id: &str) -> Option<usize> {
        self.id_to_index.get(spot_id).copied()
    }

    /// Reconstruct the record for one row.
    pub fn record(&self, idx: usize) -> SpotRecord {
        SpotRecord {
            spot_id: self.ids[idx].clone(),
            name: self.names[idx].clone(),
            latitude: self.latitudes[idx],
            longitude: self.longitudes[idx],
            country: self.countries[idx].clone(),
        }
    }

    /// Look up one spot by id.
    pub fn spot(&self, spot_id: &str) -> Option<SpotRecord> {
        self.index_of(spot_id).map(|idx| self.record(idx))
    }

    /// All rows, in table order.
    pub fn all(&self) -> Vec<SpotRecord> {
        (0..self.len()).map(|idx| self.record(idx)).collect()
    }

    /// Boolean mask of rows whose country equals `country`.
    pub fn country_mask(&self, country: &str) -> Vec<bool> {
        self.countries
            .iter()
            .map(|c| c.as_deref() == Some(country))
            .collect()
    }

    /// Boolean mask of rows whose name contains `needle`, case-insensitive.
    pub fn name_mask(&self, needle: &str) -> Vec<bool> {
        let needle = needle.to_lowercase();
        self.names_lower
            .iter()
            .map(|name| name.contains(&needle))
            .collect()
    }

    /// Sorted distinct countries present in the table.
    pub fn countries(&self) -> Vec<String> {
        self.countries
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    fn table() -> SpotTable {
        SpotTable::from_records(vec![
            testdata::spot("tarifa", "Tarifa Beach", 36.01, -5.60, Some("ES")),
            testdata::spot("leucate", "Leucate", 42.91, 3.05, Some("FR")),
            testdata::spot("dakhla", "Dakhla Lagoon", 23.71, -15.93, Some("MA")),
            testdata::spot("mystery", "Somewhere", 0.0, 0.0, None),
        ])
    }

    #[test]
    fn test_index_and_lookup() {
        let t = table();
        assert_eq!(t.len(), 4);
        assert_eq!(t.index_of("leucate"), Some(1));
        assert_eq!(t.spot("dakhla").unwrap().name, "Dakhla Lagoon");
        assert!(t.spot("nope").is_none());
    }

    #[test]
    fn test_country_mask_is_exact_equality() {
        let t = table();
        assert_eq!(t.country_mask("ES"), vec![true, false, false, false]);
        // Rows without a country never match.
        assert_eq!(t.country_mask(""), vec![false, false, false, false]);
    }

    #[test]
    fn test_name_mask_is_case_insensitive_substring() {
        let t = table();
        assert_eq!(t.name_mask("LAGOON"), vec![false, false, true, false]);
        assert_eq!(t.name_mask("a"), vec![true, true, true, false]);
    }

    #[test]
    fn test_countries_sorted_distinct() {
        assert_eq!(table().countries(), vec!["ES", "FR", "MA"]);
    }
}
