//! Malfunction workflow events
//!
//! Immutable records returned by every workflow operation, in the order
//! the corresponding facts happened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::station::AvailabilityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A report was stored as PENDING
    ReportFiled(ReportFiledEvent),
    /// A new report awaits moderation
    AdministratorNotified(AdministratorNotifiedEvent),
    /// An approval raised the station's approved-count
    CounterIncremented(CounterIncrementedEvent),
    /// The approved-count crossed the threshold
    ThresholdReached(ThresholdReachedEvent),
    /// Station availability flipped
    StatusChanged(StatusChangedEvent),
    RepairCompleted(RepairCompletedEvent),
    StationRestored(StationRestoredEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ReportFiled(_) => "report_filed",
            Event::AdministratorNotified(_) => "administrator_notified",
            Event::CounterIncremented(_) => "counter_incremented",
            Event::ThresholdReached(_) => "threshold_reached",
            Event::StatusChanged(_) => "status_changed",
            Event::RepairCompleted(_) => "repair_completed",
            Event::StationRestored(_) => "station_restored",
        }
    }

    pub fn station_id(&self) -> i32 {
        match self {
            Event::ReportFiled(e) => e.station_id,
            Event::AdministratorNotified(e) => e.station_id,
            Event::CounterIncremented(e) => e.station_id,
            Event::ThresholdReached(e) => e.station_id,
            Event::StatusChanged(e) => e.station_id,
            Event::RepairCompleted(e) => e.station_id,
            Event::StationRestored(e) => e.station_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFiledEvent {
    pub station_id: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorNotifiedEvent {
    pub station_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterIncrementedEvent {
    pub station_id: i32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdReachedEvent {
    pub station_id: i32,
    pub threshold: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangedEvent {
    pub station_id: i32,
    pub new_status: AvailabilityStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairCompletedEvent {
    pub station_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRestoredEvent {
    pub station_id: i32,
}

/// Wrapper for publishing events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
