//! Station aggregate
//!
//! Contains the Station entity, its value objects, and the repository interface.

pub mod model;
pub mod repository;

pub use model::{AvailabilityStatus, PostalCode, Station, StationCondition};
pub use repository::StationRepository;
