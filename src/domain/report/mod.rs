//! Malfunction report aggregate

pub mod model;
pub mod repository;

pub use model::{MalfunctionReport, ReportStatus, ReportText};
pub use repository::ReportRepository;
