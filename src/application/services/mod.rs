//! Application services

mod malfunction;

pub use malfunction::{MalfunctionService, ModerationPolicy, DEFAULT_THRESHOLD};
