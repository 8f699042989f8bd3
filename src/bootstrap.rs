//! Wiring of the malfunction workflow from configuration.
//!
//! Provides [`AppContext`], which owns the two in-memory stores, the event
//! bus and the workflow service built on top of them. Embedders (the CLI,
//! a future HTTP layer) start here instead of assembling the parts
//! themselves.

use std::sync::Arc;

use tracing::info;

use crate::application::events::{create_event_bus, SharedEventBus};
use crate::application::services::MalfunctionService;
use crate::config::AppConfig;
use crate::infrastructure::{InMemoryReportRepository, InMemoryStationRepository};
use crate::shared::errors::AppResult;

/// Stores, event bus and workflow service wired together
pub struct AppContext {
    pub stations: Arc<InMemoryStationRepository>,
    pub reports: Arc<InMemoryReportRepository>,
    pub event_bus: SharedEventBus,
    pub malfunctions: Arc<MalfunctionService>,
}

impl AppContext {
    /// Seed the station store from config and build the workflow service.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let stations = Arc::new(InMemoryStationRepository::with_stations(
            config.seed_stations()?,
        ));
        let reports = Arc::new(InMemoryReportRepository::new());
        let event_bus = create_event_bus();

        let malfunctions = Arc::new(
            MalfunctionService::new(stations.clone(), reports.clone())
                .with_threshold(config.workflow.threshold)
                .with_policy(config.workflow.policy)
                .with_event_bus(event_bus.clone()),
        );

        info!(
            stations = stations.len(),
            threshold = config.workflow.threshold,
            policy = ?config.workflow.policy,
            "Malfunction workflow ready"
        );

        Ok(Self {
            stations,
            reports,
            event_bus,
            malfunctions,
        })
    }
}

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` takes precedence over `logging.level`. Logs go to stderr.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
