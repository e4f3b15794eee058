use barberpro_backend::memory::MemoryBackend;
use barberpro_cli::health::{Issue, check_health};
use barberpro_cli::setup::pre_seed;
use barberpro_models::Table;

#[tokio::test]
async fn test_empty_database_reports_every_issue() {
    let backend = MemoryBackend::new();

    let report = check_health(&backend).await.unwrap();

    assert_eq!(
        report.issue_ids(),
        vec![
            "table:profiles",
            "table:barbershops",
            "table:barbers",
            "table:services",
            "table:working_hours",
            "table:appointments",
            "seed:default_barbershop",
            "seed:default_services",
        ]
    );
}

#[tokio::test]
async fn test_missing_services_table_is_the_only_issue() {
    let backend = MemoryBackend::with_schema();
    pre_seed(&backend).await.unwrap();
    backend.drop_table(Table::Services);

    let report = check_health(&backend).await.unwrap();

    assert_eq!(report.issues, vec![Issue::MissingTable(Table::Services)]);
}

#[tokio::test]
async fn test_seeded_database_is_healthy() {
    let backend = MemoryBackend::with_schema();
    let seeded = pre_seed(&backend).await.unwrap();

    assert!(seeded.barbershop_created);
    assert_eq!(seeded.services_created, 3);
    assert!(check_health(&backend).await.unwrap().healthy());
}

#[tokio::test]
async fn test_too_few_services_is_a_seed_issue() {
    let backend = MemoryBackend::with_schema();
    pre_seed(&backend).await.unwrap();
    let services = backend.rows(Table::Services);
    backend.drop_table(Table::Services);
    backend.create_table(Table::Services);
    backend.put_row(Table::Services, services[0].clone());

    let report = check_health(&backend).await.unwrap();

    assert_eq!(report.issues, vec![Issue::MissingDefaultServices]);
}

#[tokio::test]
async fn test_unreachable_backend_is_an_error_not_missing_tables() {
    let backend = MemoryBackend::with_schema();
    backend.set_unavailable(true);

    let err = check_health(&backend).await.unwrap_err();

    assert!(err.is_transient());
}
