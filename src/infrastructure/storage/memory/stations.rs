//! In-memory station store

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{DomainError, DomainResult, Station, StationRepository};

/// In-memory station storage; exclusively owns its records
#[derive(Default)]
pub struct InMemoryStationRepository {
    stations: DashMap<i32, Station>,
}

impl InMemoryStationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stations(stations: impl IntoIterator<Item = Station>) -> Self {
        let repo = Self::new();
        for station in stations {
            repo.add(station);
        }
        repo
    }

    /// Insert or replace a station record
    pub fn add(&self, station: Station) {
        self.stations.insert(station.station_id, station);
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn get_all(&self) -> DomainResult<Vec<Station>> {
        let mut stations: Vec<Station> =
            self.stations.iter().map(|e| e.value().clone()).collect();
        stations.sort_by_key(|s| s.station_id);
        Ok(stations)
    }

    async fn find(&self, station_id: i32) -> DomainResult<Option<Station>> {
        Ok(self.stations.get(&station_id).map(|s| s.clone()))
    }

    async fn set_availability(&self, station_id: i32, available: bool) -> DomainResult<()> {
        if let Some(mut station) = self.stations.get_mut(&station_id) {
            station.available = available;
            Ok(())
        } else {
            Err(DomainError::station_not_found(station_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostalCode;

    fn station(id: i32) -> Station {
        Station::new(id, PostalCode::parse("10115").unwrap())
    }

    #[tokio::test]
    async fn get_all_is_a_sorted_snapshot() {
        let repo = InMemoryStationRepository::with_stations([station(3), station(1)]);

        let snapshot = repo.get_all().await.unwrap();
        assert_eq!(
            snapshot.iter().map(|s| s.station_id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        repo.set_availability(1, false).await.unwrap();
        assert!(snapshot[0].available);
        assert!(!repo.find(1).await.unwrap().unwrap().available);
    }

    #[tokio::test]
    async fn find_unknown_station_is_none() {
        let repo = InMemoryStationRepository::new();
        assert!(repo.find(42).await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn set_availability_on_unknown_station_fails() {
        let repo = InMemoryStationRepository::with_stations([station(1)]);
        let err = repo.set_availability(2, false).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Station", .. }));
    }
}
