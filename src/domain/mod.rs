//! Domain layer
//!
//! Stations, malfunction reports, their repository contracts and the
//! events produced by the malfunction workflow.

pub mod events;
pub mod report;
pub mod station;

pub use events::Event;
pub use report::{MalfunctionReport, ReportRepository, ReportStatus, ReportText};
pub use station::{AvailabilityStatus, PostalCode, Station, StationCondition, StationRepository};

pub use crate::shared::errors::{DomainError, DomainResult};
