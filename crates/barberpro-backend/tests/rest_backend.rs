use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use barberpro_backend::{Backend, ErrorKind, NewAuthUser, Query, RestBackend, SqlExecutor};
use barberpro_config::BackendConfig;
use barberpro_models::{ProfileId, Table};

fn backend_for(server: &MockServer) -> RestBackend {
    let config = BackendConfig {
        url: server.uri(),
        anon_key: "anon-key".to_string(),
        service_role_key: Some("service-key".to_string()),
    };
    RestBackend::new(&config).unwrap()
}

#[tokio::test]
async fn test_select_sends_filters_and_service_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/barbers"))
        .and(query_param("select", "*"))
        .and(query_param("profile_id", "eq.abc"))
        .and(query_param("limit", "1"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "b1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = backend_for(&server)
        .select(Table::Barbers, &Query::new().eq("profile_id", "abc").limit(1))
        .await
        .unwrap();

    assert_eq!(rows, vec![json!({"id": "b1"})]);
}

#[tokio::test]
async fn test_count_reads_content_range_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("role", "eq.barber"))
        .and(query_param("limit", "0"))
        .and(header("prefer", "count=exact"))
        .and(header("apikey", "service-key"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("content-range", "*/1234")
                .set_body_json(json!([])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let count = backend_for(&server)
        .count(Table::Profiles, &Query::new().eq("role", "barber"))
        .await
        .unwrap();

    assert_eq!(count, 1234);
}

#[tokio::test]
async fn test_count_without_content_range_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .count(Table::Services, &Query::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Other);
}

#[tokio::test]
async fn test_missing_table_error_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/working_hours"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "PGRST205",
            "details": null,
            "hint": null,
            "message": "Could not find the table 'public.working_hours' in the schema cache"
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .select(Table::WorkingHours, &Query::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingRelation);
    assert_eq!(err.code(), Some("PGRST205"));
}

#[tokio::test]
async fn test_insert_asks_for_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/services"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({"name": "Corte"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([{"id": "s1", "name": "Corte"}])),
        )
        .mount(&server)
        .await;

    let stored = backend_for(&server)
        .insert(Table::Services, json!({"name": "Corte"}))
        .await
        .unwrap();

    assert_eq!(stored["id"], "s1");
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/admin/users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 422,
            "error_code": "email_exists",
            "msg": "A user with this email address has already been registered"
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .create_user(&NewAuthUser {
            email: "admin@barberpro.com".to_string(),
            password: "123456".to_string(),
            email_confirm: true,
            user_metadata: json!({"role": "admin"}),
        })
        .await
        .unwrap_err();

    assert!(err.is_already_exists());
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "2")
                .set_body_json(json!({"msg": "rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server).list_users(1, 1000).await.unwrap_err();

    assert!(err.is_transient());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
}

#[tokio::test]
async fn test_list_users_reads_page() {
    let server = MockServer::start().await;
    let id = ProfileId::new();
    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": id, "email": "cliente@barberpro.com", "user_metadata": {}}],
            "aud": "authenticated"
        })))
        .mount(&server)
        .await;

    let found = backend_for(&server)
        .find_user_by_email("cliente@barberpro.com")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id, id);
}

#[tokio::test]
async fn test_sign_in_uses_anon_key() {
    let server = MockServer::start().await;
    let id = ProfileId::new();
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "user": {"id": id, "email": "barbeiro@barberpro.com"}
        })))
        .mount(&server)
        .await;

    let session = backend_for(&server)
        .sign_in_with_password("barbeiro@barberpro.com", "123456")
        .await
        .unwrap();

    assert_eq!(session.user.id, id);
}

#[tokio::test]
async fn test_exec_sql_missing_function() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/exec_sql"))
        .and(body_json(json!({"sql": "SELECT 1"})))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "PGRST202",
            "message": "Could not find the function public.exec_sql(sql) in the schema cache"
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server).execute_sql("SELECT 1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingFunction);
}

#[tokio::test]
async fn test_unreachable_backend_is_transient() {
    let config = BackendConfig {
        url: "http://127.0.0.1:9".to_string(),
        anon_key: "anon".to_string(),
        service_role_key: None,
    };
    let err = RestBackend::new(&config)
        .unwrap()
        .select(Table::Profiles, &Query::new())
        .await
        .unwrap_err();

    assert!(err.is_transient());
}
