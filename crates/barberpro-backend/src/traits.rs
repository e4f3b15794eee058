use async_trait::async_trait;
use serde_json::Value;

use barberpro_models::{ProfileId, Table};

use crate::auth_users::{AuthSession, AuthUser, NewAuthUser};
use crate::error::BackendError;
use crate::query::Query;

/// Page size used when scanning the admin user list.
pub const USERS_PAGE_SIZE: u32 = 1000;

/// Row storage plus the auth service of the hosted backend.
///
/// Rows travel as JSON objects; [`crate::rows`] layers typed helpers on top.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, BackendError>;

    /// Number of rows matching `query`'s filters. The default reads them all;
    /// backends that can count server-side should override it.
    async fn count(&self, table: Table, query: &Query) -> Result<usize, BackendError> {
        Ok(self.select(table, query).await?.len())
    }

    /// Inserts one row and returns it as stored (with generated columns).
    async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError>;

    /// Applies `patch` to every row matching `query`; returns the updated rows.
    async fn update(
        &self,
        table: Table,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, BackendError>;

    /// One page of auth accounts; `page` starts at 1.
    async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<AuthUser>, BackendError>;

    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, BackendError>;

    async fn delete_user(&self, id: ProfileId) -> Result<(), BackendError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError>;

    /// Finds an auth account by email.
    ///
    /// The admin API has no indexed lookup, so the default scans every page.
    /// Backends offering a direct lookup should override this.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, BackendError> {
        let mut page = 1;
        loop {
            let users = self.list_users(page, USERS_PAGE_SIZE).await?;
            if let Some(user) = users.iter().find(|u| u.has_email(email)) {
                return Ok(Some(user.clone()));
            }
            if users.len() < USERS_PAGE_SIZE as usize {
                return Ok(None);
            }
            page += 1;
        }
    }
}

/// Executes one raw SQL statement.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute_sql(&self, sql: &str) -> Result<(), BackendError>;

    /// Short label for logs ("exec_sql RPC", "direct connection").
    fn describe(&self) -> &'static str;
}
