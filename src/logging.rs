//! # Structured Logging Module
//!
//! Environment-aware structured logging for the booking engine. Console output
//! is human-readable by default and switches to JSON lines when
//! `BOOKING_LOG_FORMAT=json`.

use chrono::Utc;
use std::process;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::Discipline;
use crate::models::BookingOutcome;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = use_json_format();

        let console_layer = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // Use try_init to avoid panic if global subscriber already set
        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            json,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("BOOKING_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn use_json_format() -> bool {
    std::env::var("BOOKING_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log structured data for a completed booking request
pub fn log_booking_outcome(worker_id: &str, outcome: &BookingOutcome) {
    tracing::info!(
        worker_id = %worker_id,
        requester = %outcome.request.requester,
        seat_id = outcome.request.seat_id,
        sequence = outcome.request.sequence,
        discipline = %outcome.discipline,
        status = %outcome.status,
        retries = outcome.retries,
        conflicts = outcome.conflicts,
        timestamp = %outcome.completed_at.to_rfc3339(),
        "🎫 BOOKING_OUTCOME"
    );
}

/// Log structured data for engine lifecycle transitions
pub fn log_lifecycle_event(
    component: &str,
    event: &str,
    discipline: Option<Discipline>,
    details: Option<&str>,
) {
    tracing::info!(
        component = %component,
        event = %event,
        discipline = discipline.map(|d| d.name()),
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🔄 LIFECYCLE_EVENT"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ ERROR"
    );
}
