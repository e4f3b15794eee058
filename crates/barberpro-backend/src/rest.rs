//! HTTP implementation of [`Backend`] and [`SqlExecutor`].
//!
//! Administrative calls (rows, admin users, `exec_sql`) authenticate with the
//! service-role key when one is configured; password sign-in always uses the
//! anonymous key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_RANGE, HeaderValue, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use barberpro_config::BackendConfig;
use barberpro_models::{ProfileId, Table};

use crate::auth_users::{AuthSession, AuthUser, NewAuthUser};
use crate::error::{ApiErrorBody, BackendError};
use crate::query::Query;
use crate::traits::{Backend, SqlExecutor};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

#[derive(Deserialize)]
struct UsersPage {
    #[serde(default)]
    users: Vec<AuthUser>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn admin_key(&self) -> &str {
        self.service_role_key.as_deref().unwrap_or(&self.anon_key)
    }

    fn with_key(&self, request: RequestBuilder, key: &str) -> RequestBuilder {
        request.header("apikey", key).bearer_auth(key)
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.as_str())
    }

    fn admin_users_url(&self) -> String {
        format!("{}/auth/v1/admin/users", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

async fn error_from_response(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(parse_retry_after);
    let text = response.text().await.unwrap_or_default();

    BackendError::Api {
        status,
        body: ApiErrorBody::parse(&text),
        retry_after,
    }
}

fn parse_retry_after(value: &HeaderValue) -> Option<Duration> {
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
fn parse_content_range_total(value: &HeaderValue) -> Option<usize> {
    value
        .to_str()
        .ok()
        .and_then(|v| v.rsplit_once('/'))
        .and_then(|(_, total)| total.trim().parse().ok())
}

#[async_trait]
impl Backend for RestBackend {
    #[instrument(skip_all, fields(table = %table))]
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, BackendError> {
        let request = self
            .client
            .get(self.table_url(table))
            .query(&query.to_pairs(true));
        self.send_json(self.with_key(request, self.admin_key())).await
    }

    /// Counts server-side: no rows cross the wire and `max-rows` does not cap
    /// the result.
    #[instrument(skip_all, fields(table = %table))]
    async fn count(&self, table: Table, query: &Query) -> Result<usize, BackendError> {
        let mut pairs = query.to_pairs(false);
        pairs.push(("select".to_string(), "*".to_string()));
        pairs.push(("limit".to_string(), "0".to_string()));
        let request = self
            .client
            .get(self.table_url(table))
            .query(&pairs)
            .header("Prefer", "count=exact");
        let response = self.send(self.with_key(request, self.admin_key())).await?;

        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(parse_content_range_total)
            .ok_or_else(|| BackendError::Decode(format!("count of {table} had no Content-Range total")))
    }

    #[instrument(skip_all, fields(table = %table))]
    async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let rows: Vec<Value> = self.send_json(self.with_key(request, self.admin_key())).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode(format!("insert into {table} returned no row")))
    }

    #[instrument(skip_all, fields(table = %table))]
    async fn update(
        &self,
        table: Table,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, BackendError> {
        let request = self
            .client
            .patch(self.table_url(table))
            .query(&query.to_pairs(false))
            .header("Prefer", "return=representation")
            .json(&patch);
        self.send_json(self.with_key(request, self.admin_key())).await
    }

    async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<AuthUser>, BackendError> {
        debug!(page, per_page, "listing auth users");
        let request = self
            .client
            .get(self.admin_users_url())
            .query(&[("page", page), ("per_page", per_page)]);
        let page: UsersPage = self.send_json(self.with_key(request, self.admin_key())).await?;
        Ok(page.users)
    }

    #[instrument(skip_all, fields(email = %user.email))]
    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, BackendError> {
        let request = self.client.post(self.admin_users_url()).json(user);
        self.send_json(self.with_key(request, self.admin_key())).await
    }

    async fn delete_user(&self, id: ProfileId) -> Result<(), BackendError> {
        let request = self
            .client
            .delete(format!("{}/{}", self.admin_users_url(), id));
        self.send(self.with_key(request, self.admin_key())).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(email = %email))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let request = self
            .client
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        self.send_json(self.with_key(request, &self.anon_key)).await
    }
}

#[async_trait]
impl SqlExecutor for RestBackend {
    async fn execute_sql(&self, sql: &str) -> Result<(), BackendError> {
        let request = self
            .client
            .post(format!("{}/rest/v1/rpc/exec_sql", self.base_url))
            .json(&json!({ "sql": sql }));
        self.send(self.with_key(request, self.admin_key())).await?;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "exec_sql RPC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retry_after_seconds() {
        let value = HeaderValue::from_static("3");
        assert_eq!(parse_retry_after(&value), Some(Duration::from_secs(3)));

        let value = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(&value), None);
    }

    #[test]
    fn test_parse_content_range_total() {
        let total = |v: &'static str| parse_content_range_total(&HeaderValue::from_static(v));
        assert_eq!(total("0-24/3573"), Some(3573));
        assert_eq!(total("*/0"), Some(0));
        assert_eq!(total("0-24/*"), None);
    }

    #[test]
    fn test_admin_key_prefers_service_role() {
        let config = BackendConfig {
            url: "http://localhost:54321/".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: Some("service".to_string()),
        };
        let backend = RestBackend::new(&config).unwrap();
        assert_eq!(backend.admin_key(), "service");
        assert_eq!(backend.base_url(), "http://localhost:54321");
        assert_eq!(
            backend.table_url(Table::WorkingHours),
            "http://localhost:54321/rest/v1/working_hours"
        );
    }
}
