//! Transit station catalog.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::RouteError;
use crate::network::records::StationRecord;
use crate::network::types::{Station, StationId};

/// Stations keyed by id, iterated in load order.
///
/// Load order is part of the contract: [`StationCatalog::find_by_name_substring`]
/// returns the first match in that order.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: IndexMap<StationId, Station>,
}

impl StationCatalog {
    /// Builds the catalog from raw feed records, skipping malformed ones.
    ///
    /// A repeated id replaces the earlier station but keeps its position.
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = StationRecord>,
    {
        let mut catalog = Self::default();
        let mut skipped = 0usize;

        for record in records {
            match record.into_station() {
                Ok(station) => catalog.insert(station),
                Err(e) => {
                    skipped += 1;
                    warn!(error = %e, "Skipping station record");
                }
            }
        }

        debug!(stations = catalog.len(), skipped, "Station catalog loaded");
        catalog
    }

    pub fn from_stations<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = Station>,
    {
        let mut catalog = Self::default();
        for station in stations {
            catalog.insert(station);
        }
        catalog
    }

    fn insert(&mut self, station: Station) {
        self.stations.insert(station.id.clone(), station);
    }

    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn contains(&self, id: &StationId) -> bool {
        self.stations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Station> {
        self.stations.values_mut()
    }

    /// First station, in load order, whose name contains `query` ignoring case.
    pub fn find_by_name_substring(&self, query: &str) -> Result<&StationId, RouteError> {
        let needle = query.to_lowercase();
        self.stations
            .values()
            .find(|s| s.name.to_lowercase().contains(&needle))
            .map(|s| &s.id)
            .ok_or_else(|| RouteError::NotFound(query.to_string()))
    }

    /// Every station whose name contains `query`, in load order.
    pub fn search(&self, query: &str) -> Vec<&Station> {
        let needle = query.to_lowercase();
        self.stations
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_skips_malformed_records() {
        let bad = StationRecord {
            id: Some("bad".into()),
            common_name: Some("Bad".into()),
            lat: None,
            lon: Some(0.0),
        };
        let catalog = StationCatalog::load(vec![
            StationRecord::new("a", "Alpha", 0.0, 0.0),
            bad,
            StationRecord::new("b", "Beta", 0.0, 1.0),
        ]);

        assert_eq!(catalog.len(), 2);
        assert!(!catalog.contains(&StationId::new("bad")));
    }

    #[test]
    fn test_load_empty_feed() {
        let catalog = StationCatalog::load(Vec::new());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_repeated_id_overwrites_in_place() {
        let catalog = StationCatalog::load(vec![
            StationRecord::new("a", "Old Name", 0.0, 0.0),
            StationRecord::new("b", "Beta", 0.0, 1.0),
            StationRecord::new("a", "New Name", 0.5, 0.5),
        ]);

        let names: Vec<_> = catalog.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["New Name", "Beta"]);
    }

    #[test]
    fn test_find_by_name_substring_returns_first_in_load_order() {
        let catalog = StationCatalog::load(vec![
            StationRecord::new("bst", "Baker Street Station", 51.52, -0.157),
            StationRecord::new("hst", "High Street Station", 51.50, -0.192),
        ]);

        for _ in 0..5 {
            assert_eq!(
                catalog.find_by_name_substring("street").unwrap().as_str(),
                "bst"
            );
        }
        assert_eq!(
            catalog.find_by_name_substring("HIGH").unwrap().as_str(),
            "hst"
        );
    }

    #[test]
    fn test_find_by_name_substring_follows_load_order_not_name() {
        let catalog = StationCatalog::load(vec![
            StationRecord::new("hst", "High Street Station", 51.50, -0.192),
            StationRecord::new("bst", "Baker Street Station", 51.52, -0.157),
        ]);
        assert_eq!(
            catalog.find_by_name_substring("street").unwrap().as_str(),
            "hst"
        );
    }

    #[test]
    fn test_find_by_name_substring_not_found() {
        let catalog = StationCatalog::load(vec![StationRecord::new("a", "Alpha", 0.0, 0.0)]);
        assert_eq!(
            catalog.find_by_name_substring("omega"),
            Err(RouteError::NotFound("omega".into()))
        );
    }

    #[test]
    fn test_search_lists_all_matches() {
        let catalog = StationCatalog::load(vec![
            StationRecord::new("bst", "Baker Street Station", 51.52, -0.157),
            StationRecord::new("vic", "Victoria Station", 51.49, -0.144),
            StationRecord::new("hst", "High Street Station", 51.50, -0.192),
        ]);
        let ids: Vec<_> = catalog
            .search("street")
            .into_iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["bst", "hst"]);
    }
}
