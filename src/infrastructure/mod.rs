//! Infrastructure layer
//!
//! Concrete implementations of the domain repository contracts.

pub mod storage;

pub use storage::{InMemoryReportRepository, InMemoryStationRepository};
