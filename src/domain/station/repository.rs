//! Station repository interface

use async_trait::async_trait;

use super::model::Station;
use crate::domain::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Snapshot of every known station, ordered by id
    async fn get_all(&self) -> DomainResult<Vec<Station>>;

    async fn find(&self, station_id: i32) -> DomainResult<Option<Station>>;

    /// Fails with `NotFound` when no station has this id
    async fn set_availability(&self, station_id: i32, available: bool) -> DomainResult<()>;
}
