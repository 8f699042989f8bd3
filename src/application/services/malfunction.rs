//! Malfunction reporting workflow
//!
//! Drives the report lifecycle (PENDING -> APPROVED / REJECTED) and the
//! station availability transitions that follow from it:
//!
//! - an approval that lifts the approved-count to the threshold takes the
//!   station out of service
//! - a completed repair puts it back and wipes its report history

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::events::SharedEventBus;
use crate::domain::events::{
    AdministratorNotifiedEvent, CounterIncrementedEvent, RepairCompletedEvent, ReportFiledEvent,
    StationRestoredEvent, StatusChangedEvent, ThresholdReachedEvent,
};
use crate::domain::{
    AvailabilityStatus, DomainError, DomainResult, Event, MalfunctionReport, ReportRepository,
    ReportStatus, ReportText, Station, StationCondition, StationRepository,
};

/// Approved reports needed before a station is taken out of service
pub const DEFAULT_THRESHOLD: u32 = 5;

/// How filed reports reach the approved-count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationPolicy {
    /// Reports stay PENDING until an administrator approves them
    #[default]
    ApprovalRequired,
    /// Filing approves the report right away
    Immediate,
}

/// Workflow service for malfunction reports.
///
/// Owns no records; every mutation goes through the two stores.
pub struct MalfunctionService {
    stations: Arc<dyn StationRepository>,
    reports: Arc<dyn ReportRepository>,
    threshold: u32,
    policy: ModerationPolicy,
    event_bus: Option<SharedEventBus>,
    // Serialises every mutating operation so a threshold crossing and a
    // repair can never interleave.
    transitions: Mutex<()>,
}

impl MalfunctionService {
    pub fn new(stations: Arc<dyn StationRepository>, reports: Arc<dyn ReportRepository>) -> Self {
        Self {
            stations,
            reports,
            threshold: DEFAULT_THRESHOLD,
            policy: ModerationPolicy::default(),
            event_bus: None,
            transitions: Mutex::new(()),
        }
    }

    /// Thresholds below 1 are raised to 1.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold.max(1);
        self
    }

    pub fn with_policy(mut self, policy: ModerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_event_bus(mut self, event_bus: SharedEventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn policy(&self) -> ModerationPolicy {
        self.policy
    }

    // ── Commands ────────────────────────────────────────────────

    /// File a malfunction report against a station.
    pub async fn file_report(&self, station_id: i32, text: &str) -> DomainResult<Vec<Event>> {
        self.submit_report(station_id, text)
            .await
            .map(|(_, events)| events)
    }

    /// Like [`file_report`](Self::file_report) but also hands back the
    /// generated report id.
    pub async fn submit_report(
        &self,
        station_id: i32,
        text: &str,
    ) -> DomainResult<(Uuid, Vec<Event>)> {
        let text = ReportText::parse(text)
            .inspect_err(|e| debug!(station_id, error = %e, "Report text rejected"))?;

        let _guard = self.transitions.lock().await;

        self.require_station(station_id).await?;

        if self.reports.has_duplicate(station_id, text.as_str()).await? {
            warn!(station_id, "Duplicate malfunction report");
            return Err(DomainError::Conflict(format!(
                "Duplicate report content for station {}",
                station_id
            )));
        }

        let report_id = self.reports.save(station_id, &text).await?;
        metrics::counter!("malfunction_reports_filed_total").increment(1);
        info!(station_id, %report_id, "Malfunction report filed");

        let mut events = vec![Event::ReportFiled(ReportFiledEvent {
            station_id,
            text: text.into(),
        })];

        match self.policy {
            ModerationPolicy::ApprovalRequired => {
                events.push(Event::AdministratorNotified(AdministratorNotifiedEvent {
                    station_id,
                }));
            }
            ModerationPolicy::Immediate => {
                events.extend(self.apply_approval(report_id, station_id).await?);
            }
        }

        self.publish(&events);
        Ok((report_id, events))
    }

    /// Approve a pending report; may take the station out of service.
    pub async fn approve_report(&self, report_id: Uuid) -> DomainResult<Vec<Event>> {
        let _guard = self.transitions.lock().await;

        let report = self.require_report(report_id).await?;
        match report.status {
            ReportStatus::Approved => {
                debug!(%report_id, "Report already approved");
                return Ok(Vec::new());
            }
            ReportStatus::Rejected => {
                return Err(DomainError::Conflict(format!(
                    "Report {} was already rejected",
                    report_id
                )));
            }
            ReportStatus::Pending => {}
        }

        // Resolve the station before any write so a failure leaves nothing half done.
        self.require_station(report.station_id).await?;

        let events = self.apply_approval(report_id, report.station_id).await?;

        self.publish(&events);
        Ok(events)
    }

    /// Reject a pending report. Never touches the station.
    pub async fn reject_report(&self, report_id: Uuid) -> DomainResult<Vec<Event>> {
        let _guard = self.transitions.lock().await;

        let report = self.require_report(report_id).await?;
        match report.status {
            ReportStatus::Rejected => {
                debug!(%report_id, "Report already rejected");
                return Ok(Vec::new());
            }
            ReportStatus::Approved => {
                return Err(DomainError::Conflict(format!(
                    "Report {} was already approved",
                    report_id
                )));
            }
            ReportStatus::Pending => {}
        }

        self.reports
            .set_status(report_id, ReportStatus::Rejected)
            .await?;
        metrics::counter!("malfunction_reports_moderated_total", "decision" => "rejected")
            .increment(1);
        info!(%report_id, station_id = report.station_id, "Malfunction report rejected");

        Ok(Vec::new())
    }

    /// Put a repaired station back into service and clear its reports.
    pub async fn mark_repair_completed(&self, station_id: i32) -> DomainResult<Vec<Event>> {
        let _guard = self.transitions.lock().await;

        let count = self.reports.approved_count(station_id).await?;
        if count < self.threshold {
            warn!(station_id, count, threshold = self.threshold, "Repair refused");
            return Err(DomainError::Validation(format!(
                "Cannot repair: station {} has only {} approved reports (threshold: {})",
                station_id, count, self.threshold
            )));
        }

        self.stations.set_availability(station_id, true).await?;
        self.reports.clear(station_id).await?;
        metrics::counter!("stations_restored_total").increment(1);
        info!(station_id, "Repair completed, station restored");

        let events = vec![
            Event::RepairCompleted(RepairCompletedEvent { station_id }),
            Event::StationRestored(StationRestoredEvent { station_id }),
        ];
        self.publish(&events);
        Ok(events)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn station_condition(&self, station_id: i32) -> DomainResult<StationCondition> {
        let station = self.require_station(station_id).await?;
        let count = self.reports.approved_count(station_id).await?;
        Ok(StationCondition::derive(station.available, count))
    }

    pub async fn approved_count(&self, station_id: i32) -> DomainResult<u32> {
        self.reports.approved_count(station_id).await
    }

    /// Reports waiting for a moderation decision
    pub async fn pending_reports(&self) -> DomainResult<Vec<MalfunctionReport>> {
        self.reports.pending().await
    }

    /// Stations with at least one approved report
    pub async fn affected_stations(&self) -> DomainResult<BTreeSet<i32>> {
        self.reports.affected_station_ids().await
    }

    // ── Internals ───────────────────────────────────────────────

    /// Mark the report approved and take the station down when this
    /// approval is the one that reaches the threshold. Caller holds the lock.
    async fn apply_approval(&self, report_id: Uuid, station_id: i32) -> DomainResult<Vec<Event>> {
        let previous = self.reports.approved_count(station_id).await?;
        self.reports
            .set_status(report_id, ReportStatus::Approved)
            .await?;
        let count = self.reports.approved_count(station_id).await?;
        metrics::counter!("malfunction_reports_moderated_total", "decision" => "approved")
            .increment(1);
        info!(%report_id, station_id, count, "Malfunction report approved");

        let mut events = vec![Event::CounterIncremented(CounterIncrementedEvent {
            station_id,
            count,
        })];

        if previous < self.threshold && count >= self.threshold {
            self.stations.set_availability(station_id, false).await?;
            metrics::counter!("stations_marked_unavailable_total").increment(1);
            warn!(
                station_id,
                count,
                threshold = self.threshold,
                "Threshold reached, station marked unavailable"
            );

            events.push(Event::ThresholdReached(ThresholdReachedEvent {
                station_id,
                threshold: self.threshold,
                count,
            }));
            events.push(Event::StatusChanged(StatusChangedEvent {
                station_id,
                new_status: AvailabilityStatus::Unavailable,
            }));
        }

        Ok(events)
    }

    async fn require_station(&self, station_id: i32) -> DomainResult<Station> {
        self.stations
            .find(station_id)
            .await?
            .ok_or_else(|| DomainError::station_not_found(station_id))
    }

    async fn require_report(&self, report_id: Uuid) -> DomainResult<MalfunctionReport> {
        self.reports
            .find(report_id)
            .await?
            .ok_or_else(|| DomainError::report_not_found(report_id))
    }

    fn publish(&self, events: &[Event]) {
        if let Some(bus) = &self.event_bus {
            bus.publish_all(events);
        }
    }
}
