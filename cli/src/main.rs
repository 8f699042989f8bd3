//! ChargeHub CLI
//!
//! Drives the malfunction workflow against the stations seeded from the
//! configuration file.
//!
//! ```sh
//! # Validate config and print the effective settings
//! chargehub check
//!
//! # List seeded stations with their condition
//! chargehub --config ./chargehub.toml stations
//!
//! # Run a moderation script, one JSON line per command
//! chargehub --threshold 3 replay moderation.txt
//! ```

mod script;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use chargehub::domain::StationRepository;
use chargehub::{init_tracing, AppConfig, AppContext};

use script::{parse_script, Command as ScriptCommand};

/// ChargeHub: malfunction reports and station availability.
#[derive(Parser, Debug)]
#[command(name = "chargehub", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CHARGEHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the approved-report threshold.
    #[arg(long)]
    threshold: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration and print the effective settings.
    Check,
    /// List the seeded stations with their current condition.
    Stations,
    /// Run a moderation script and print the resulting events.
    Replay {
        /// Script file, one command per line.
        script: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(chargehub::resolve_config_path);
    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(&AppConfig::default());
            error!("Failed to load config {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(threshold) = cli.threshold {
        config.workflow.threshold = threshold;
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let ctx = AppContext::from_config(&config)?;

    match cli.command {
        Command::Check => {
            let summary = json!({
                "config": config_path.display().to_string(),
                "threshold": ctx.malfunctions.threshold(),
                "policy": ctx.malfunctions.policy(),
                "stations": ctx.stations.len(),
                "logging": config.logging,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Stations => {
            for station in ctx.stations.get_all().await? {
                let condition = ctx.malfunctions.station_condition(station.station_id).await?;
                println!(
                    "{}",
                    json!({ "station": station, "condition": condition })
                );
            }
        }
        Command::Replay { script } => {
            let source = std::fs::read_to_string(&script)?;
            let lines = parse_script(&source)?;
            replay(&ctx, lines).await?;
        }
    }

    Ok(())
}

/// Run every script line; failed operations are printed, not fatal.
async fn replay(
    ctx: &AppContext,
    lines: Vec<script::ScriptLine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = &ctx.malfunctions;
    let mut filed: Vec<Uuid> = Vec::new();

    for script::ScriptLine { line, command } in lines {
        let outcome = match &command {
            ScriptCommand::File { station_id, text } => service
                .submit_report(*station_id, text)
                .await
                .map(|(id, events)| {
                    filed.push(id);
                    json!({ "report": filed.len(), "report_id": id, "events": events })
                }),
            ScriptCommand::Approve(n) | ScriptCommand::Reject(n) => {
                match filed.get(n - 1) {
                    None => {
                        println!(
                            "{}",
                            json!({ "line": line, "error": format!("no report #{} filed yet", n) })
                        );
                        continue;
                    }
                    Some(id) if matches!(command, ScriptCommand::Approve(_)) => service
                        .approve_report(*id)
                        .await
                        .map(|events| json!({ "events": events })),
                    Some(id) => service
                        .reject_report(*id)
                        .await
                        .map(|events| json!({ "events": events })),
                }
            }
            ScriptCommand::Repair(station_id) => service
                .mark_repair_completed(*station_id)
                .await
                .map(|events| json!({ "events": events })),
            ScriptCommand::Status(station_id) => {
                match service.station_condition(*station_id).await {
                    Ok(condition) => service.approved_count(*station_id).await.map(|count| {
                        json!({
                            "station_id": station_id,
                            "condition": condition,
                            "approved_count": count,
                        })
                    }),
                    Err(e) => Err(e),
                }
            }
        };

        let output = match outcome {
            Ok(mut value) => {
                value["line"] = json!(line);
                value
            }
            Err(e) => json!({ "line": line, "error": e.to_string() }),
        };
        println!("{}", serde_json::to_string(&output)?);
    }

    Ok(())
}
