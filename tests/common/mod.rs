#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;

use barberpro::router::init_router;
use barberpro::state::AppState;
use barberpro_auth::create_session_token;
use barberpro_backend::memory::MemoryBackend;
use barberpro_backend::{Query, RetryPolicy, rows};
use barberpro_cli::seeder::{TEST_ACCOUNTS, seed_users};
use barberpro_config::JwtConfig;
use barberpro_models::{Profile, ProfileId, Table, UserRole};

pub const SESSION_COOKIE: &str = barberpro::middleware::auth::SESSION_COOKIE;

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

/// Router over an in-memory backend seeded with the three test accounts.
pub async fn setup_test_app() -> (axum::Router, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::with_schema());
    let report = seed_users(backend.as_ref(), &TEST_ACCOUNTS, &RetryPolicy::none()).await;
    assert!(report.succeeded(), "{:?}", report.failures);

    let state = AppState::new(backend.clone(), jwt_config());
    (init_router(state), backend)
}

pub async fn profile_id(backend: &MemoryBackend, role: UserRole) -> ProfileId {
    let profile: Profile =
        rows::fetch_optional(backend, Table::Profiles, &Query::new().eq("role", role.as_str()))
            .await
            .unwrap()
            .unwrap();
    profile.id
}

/// `Cookie` header value carrying a valid session for `role`.
pub fn session_cookie(profile_id: ProfileId, role: UserRole) -> String {
    let token = create_session_token(
        profile_id,
        &format!("{}@barberpro.com", role.as_str()),
        role,
        &jwt_config(),
    )
    .unwrap();
    format!("{SESSION_COOKIE}={token}")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
