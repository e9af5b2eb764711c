//! # Outcome Sink and Metrics

pub mod outcome_sink;

pub use outcome_sink::{MetricsSnapshot, OutcomeSink};
