//! In-memory store implementations

mod reports;
mod stations;

pub use reports::InMemoryReportRepository;
pub use stations::InMemoryStationRepository;
