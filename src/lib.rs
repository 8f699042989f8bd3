//! # ChargeHub malfunction workflow
//!
//! Availability tracking and crowd-sourced malfunction reports for a fixed
//! set of charging stations.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Stations, reports, value objects, repository traits, events
//! - **application**: The malfunction workflow service and the event bus
//! - **infrastructure**: In-memory station and report stores
//! - **config**: TOML configuration
//! - **bootstrap**: Wiring and tracing setup for embedders

pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, resolve_config_path, AppConfig};

pub use bootstrap::{init_tracing, AppContext};

pub use application::{
    create_event_bus, EventBus, MalfunctionService, ModerationPolicy, SharedEventBus,
};
pub use domain::{DomainError, DomainResult, Event};
