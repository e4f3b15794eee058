use std::time::Duration;

use barberpro_backend::RetryPolicy;
use barberpro_backend::memory::MemoryBackend;
use barberpro_cli::BUNDLED_SCHEMA;
use barberpro_cli::health::check_health;
use barberpro_cli::migrate::MigrateOptions;
use barberpro_cli::seeder::TEST_ACCOUNTS;
use barberpro_cli::setup::{SetupError, fix, run_setup};
use barberpro_models::Table;

fn options() -> MigrateOptions {
    MigrateOptions {
        force: false,
        retry: RetryPolicy::new(1, Duration::from_millis(1)),
    }
}

#[tokio::test]
async fn test_empty_database_becomes_healthy() {
    let backend = MemoryBackend::new();
    assert_eq!(check_health(&backend).await.unwrap().issues.len(), 8);

    let report = fix(&backend, &backend, BUNDLED_SCHEMA, &options(), true).await.unwrap();

    assert_eq!(report.before.issues.len(), 8);
    assert!(report.migration.is_some());
    assert!(report.after.healthy(), "{:?}", report.after.issue_ids());
}

#[tokio::test]
async fn test_healthy_database_is_left_alone() {
    let backend = MemoryBackend::with_schema();
    fix(&backend, &backend, BUNDLED_SCHEMA, &options(), true).await.unwrap();
    let executed = backend.executed_statements().len();

    let report = fix(&backend, &backend, BUNDLED_SCHEMA, &options(), false).await.unwrap();

    assert!(report.migration.is_none());
    assert!(report.after.healthy());
    assert_eq!(backend.executed_statements().len(), executed);
}

#[tokio::test]
async fn test_full_setup_seeds_after_migrating() {
    let backend = MemoryBackend::new();
    backend.enable_profile_trigger();

    let report = run_setup(&backend, &backend, BUNDLED_SCHEMA, &TEST_ACCOUNTS, &options())
        .await
        .unwrap();

    assert!(report.seed.succeeded(), "{:?}", report.seed.failures);
    assert_eq!(report.seed.created, 3);
    assert_eq!(backend.row_count(Table::Profiles), 3);
    assert_eq!(backend.row_count(Table::WorkingHours), 7);
}

#[tokio::test]
async fn test_setup_stops_when_exec_sql_is_missing() {
    let backend = MemoryBackend::new();
    backend.set_exec_sql_installed(false);

    let err = run_setup(&backend, &backend, BUNDLED_SCHEMA, &TEST_ACCOUNTS, &options())
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::Migrate(_)));
    assert_eq!(backend.user_count(), 0);
}
