//! # Booking Engine Demo
//!
//! Runs a deterministic contended workload, every seat requested by two
//! users, under each discipline and prints the resulting seat map and
//! metrics as JSON.
//!
//! Configuration comes from `config/booking.toml` plus the usual environment
//! overlays; see [`seat_booking::config`].

use anyhow::Context;
use serde_json::json;
use tracing::info;

use seat_booking::logging::init_structured_logging;
use seat_booking::{BookingCoordinator, BookingStatus, ConfigManager, Discipline};

const CONTENDERS: [&str; 2] = ["alice", "bob"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let manager = ConfigManager::load().context("failed to load booking configuration")?;
    info!(
        environment = %manager.environment(),
        config = %manager.debug_config(),
        "🎟️ DEMO: Configuration loaded"
    );

    let mut reports = Vec::new();
    for discipline in [Discipline::Pessimistic, Discipline::Optimistic] {
        reports.push(run_workload(manager.config().clone(), discipline).await?);
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

async fn run_workload(
    config: seat_booking::BookingConfig,
    discipline: Discipline,
) -> anyhow::Result<serde_json::Value> {
    let coordinator = BookingCoordinator::new(config)?;
    coordinator.set_discipline(discipline);
    coordinator.start()?;

    let total_seats = coordinator.registry().total_seats();
    for seat_id in 1..=total_seats {
        for requester in CONTENDERS {
            coordinator
                .enqueue_wait(requester, seat_id)
                .await
                .with_context(|| format!("failed to enqueue seat {seat_id} for {requester}"))?;
        }
    }

    coordinator.shutdown().await?;

    let metrics = coordinator.metrics_snapshot();
    let seat_map: Vec<_> = coordinator
        .snapshot()
        .into_iter()
        .map(|(seat_id, status)| json!({ "seat": seat_id, "status": status }))
        .collect();
    let winners: Vec<_> = coordinator
        .outcomes()
        .into_iter()
        .filter(|outcome| outcome.status == BookingStatus::Booked)
        .map(|outcome| json!({ "seat": outcome.request.seat_id, "requester": outcome.request.requester }))
        .collect();

    info!(
        %discipline,
        successes = metrics.successes,
        failures = metrics.failures(),
        conflicts = metrics.conflicts,
        retries = metrics.retries,
        "✅ DEMO: Workload finished"
    );

    Ok(json!({
        "discipline": discipline,
        "metrics": metrics,
        "success_rate": metrics.success_rate(),
        "seats": seat_map,
        "winners": winners,
    }))
}
