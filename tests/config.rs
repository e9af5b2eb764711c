//! Configuration Loading Tests
//!
//! Layering of on-disk TOML files and environment overrides, and the effect
//! of configuration on a running coordinator.

use std::fs;
use std::path::Path;

use seat_booking::config::ConfigManager;
use seat_booking::{BookingConfig, BookingCoordinator, ConfigurationError, Discipline};

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write config file");
}

#[test]
fn missing_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let manager = ConfigManager::load_with_env_prefix(
        Some(dir.path().to_path_buf()),
        "test",
        "BOOKING_CONFIG_IT_EMPTY",
    )
    .unwrap();

    let defaults = BookingConfig::default();
    assert_eq!(manager.config().registry.total_seats, defaults.registry.total_seats);
    assert_eq!(manager.config().workers.count, defaults.workers.count);
    assert_eq!(manager.environment(), "test");
    assert_eq!(manager.config_directory(), dir.path());
}

#[test]
fn environment_file_overrides_base_file() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "booking.toml",
        r#"
[registry]
total_seats = 12

[booking]
discipline = "optimistic"
max_retries = 5
"#,
    );
    write(
        dir.path(),
        "booking.production.toml",
        r#"
[booking]
discipline = "pessimistic"
"#,
    );

    let manager = ConfigManager::load_with_env_prefix(
        Some(dir.path().to_path_buf()),
        "production",
        "BOOKING_CONFIG_IT_LAYERS",
    )
    .unwrap();

    let config = manager.config();
    assert_eq!(config.registry.total_seats, 12);
    assert_eq!(config.booking.discipline, Discipline::Pessimistic);
    assert_eq!(config.booking.max_retries, 5);
}

#[test]
fn environment_variables_override_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "booking.toml", "[workers]\ncount = 2\n");

    std::env::set_var("BOOKING_CONFIG_IT_ENV__WORKERS__COUNT", "9");
    let result = ConfigManager::load_with_env_prefix(
        Some(dir.path().to_path_buf()),
        "test",
        "BOOKING_CONFIG_IT_ENV",
    );
    std::env::remove_var("BOOKING_CONFIG_IT_ENV__WORKERS__COUNT");

    assert_eq!(result.unwrap().config().workers.count, 9);
}

#[test]
fn invalid_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "booking.toml",
        "[validation]\nmin_delay_ms = 50\nmax_delay_ms = 10\n",
    );

    let result = ConfigManager::load_with_env_prefix(
        Some(dir.path().to_path_buf()),
        "test",
        "BOOKING_CONFIG_IT_INVALID",
    );

    assert!(matches!(
        result,
        Err(ConfigurationError::InvalidValue { .. })
    ));
}

#[test]
fn repository_config_files_are_valid() {
    let manager = ConfigManager::load_with_env_prefix(
        Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("config")),
        "test",
        "BOOKING_CONFIG_IT_REPO",
    )
    .unwrap();

    let config = manager.config();
    assert_eq!(config.registry.total_seats, 40);
    assert_eq!(config.workers.processing_delay_ms, 0);
    assert_eq!(config.validation.max_delay_ms, 0);
}

#[tokio::test]
async fn coordinator_honours_configured_discipline_and_capacity() {
    let mut config = BookingConfig::for_testing(3, 1);
    config.booking.discipline = Discipline::Pessimistic;
    config.queue.capacity = Some(1);

    let coordinator = BookingCoordinator::new(config).unwrap();

    assert_eq!(coordinator.discipline(), Discipline::Pessimistic);
    coordinator.enqueue("alice", 1).unwrap();
    assert!(coordinator.enqueue("bob", 2).is_err());

    coordinator.shutdown().await.unwrap();
    assert_eq!(coordinator.metrics_snapshot().successes, 1);
}
