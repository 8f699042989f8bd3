//! Malfunction report repository interface

use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{MalfunctionReport, ReportStatus, ReportText};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Store a new PENDING report and return its generated id.
    ///
    /// Does not check for duplicates; callers use `has_duplicate` first.
    async fn save(&self, station_id: i32, report_text: &ReportText) -> DomainResult<Uuid>;

    /// Whether any report (any status) for this station has exactly this text
    async fn has_duplicate(&self, station_id: i32, report_text: &str) -> DomainResult<bool>;

    async fn find(&self, report_id: Uuid) -> DomainResult<Option<MalfunctionReport>>;

    /// Set the status and keep the station's approved-count in step.
    ///
    /// Returns the previous status. Fails with `NotFound` for an unknown id.
    async fn set_status(&self, report_id: Uuid, status: ReportStatus)
        -> DomainResult<ReportStatus>;

    /// Number of APPROVED reports for the station, 0 when untouched
    async fn approved_count(&self, station_id: i32) -> DomainResult<u32>;

    async fn all(&self) -> DomainResult<Vec<MalfunctionReport>>;

    async fn pending(&self) -> DomainResult<Vec<MalfunctionReport>>;

    /// Stations with an approved-count above zero
    async fn affected_station_ids(&self) -> DomainResult<BTreeSet<i32>>;

    /// Delete every report of the station and reset its approved-count
    async fn clear(&self, station_id: i32) -> DomainResult<()>;
}
