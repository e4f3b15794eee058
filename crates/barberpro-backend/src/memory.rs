//! In-memory [`Backend`] and [`SqlExecutor`] for tests.
//!
//! Mimics the hosted backend closely enough for the tooling to be exercised
//! end to end: unique constraints answer with `23505`, missing tables with
//! `42P01`, a missing `exec_sql` function with `PGRST202`, and the auth service
//! rejects taken emails with `email_exists`. Failure injection covers the
//! intermittent "Database error creating new user" the real service produces.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use barberpro_models::{ProfileId, Table};

use crate::auth_users::{AuthSession, AuthUser, NewAuthUser};
use crate::error::BackendError;
use crate::query::{Query, filter_text};
use crate::traits::{Backend, SqlExecutor};

/// Column groups that must be unique per table (besides `id`).
fn unique_keys(table: Table) -> &'static [&'static [&'static str]] {
    match table {
        Table::Profiles => &[&["email"]],
        Table::Barbers => &[&["profile_id"]],
        Table::Services => &[&["barbershop_id", "name"]],
        Table::WorkingHours => &[&["barber_id", "day_of_week"]],
        Table::Barbershops | Table::Appointments => &[],
    }
}

#[derive(Debug)]
struct StoredUser {
    user: AuthUser,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<Table, Vec<Value>>,
    users: Vec<StoredUser>,
    exec_sql_installed: bool,
    unavailable: bool,
    failing_user_creations: u32,
    profile_trigger: bool,
    executed: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    /// An empty database: no tables, `exec_sql` installed.
    pub fn new() -> Self {
        let backend = Self::default();
        backend.lock().exec_sql_installed = true;
        backend
    }

    /// A database with every application table present and empty.
    pub fn with_schema() -> Self {
        let backend = Self::new();
        for table in Table::ALL {
            backend.create_table(table);
        }
        backend
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_table(&self, table: Table) {
        self.lock().tables.entry(table).or_default();
    }

    pub fn drop_table(&self, table: Table) {
        self.lock().tables.remove(&table);
    }

    pub fn has_table(&self, table: Table) -> bool {
        self.lock().tables.contains_key(&table)
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    pub fn row_count(&self, table: Table) -> usize {
        self.lock().tables.get(&table).map_or(0, Vec::len)
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn set_exec_sql_installed(&self, installed: bool) {
        self.lock().exec_sql_installed = installed;
    }

    /// While set, every call fails as if the backend were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// The next `count` create-user calls fail with a transient 500.
    pub fn fail_next_user_creations(&self, count: u32) {
        self.lock().failing_user_creations = count;
    }

    /// Emulates the sign-up trigger that inserts a profile for each new
    /// auth account, taking name and role from its metadata.
    pub fn enable_profile_trigger(&self) {
        self.lock().profile_trigger = true;
    }

    /// Statements received through `exec_sql`, in order.
    pub fn executed_statements(&self) -> Vec<String> {
        self.lock().executed.clone()
    }

    /// Inserts a row bypassing constraints, for setting up drifted data.
    pub fn put_row(&self, table: Table, row: Value) {
        self.lock().tables.entry(table).or_default().push(row);
    }
}

impl State {
    fn check_available(&self) -> Result<(), BackendError> {
        if self.unavailable {
            return Err(BackendError::Unavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(())
    }

    fn table_mut(&mut self, table: Table) -> Result<&mut Vec<Value>, BackendError> {
        self.tables
            .get_mut(&table)
            .ok_or_else(|| missing_relation(table))
    }

    fn insert_row(&mut self, table: Table, row: Value) -> Result<Value, BackendError> {
        let Value::Object(mut object) = row else {
            return Err(BackendError::api(400, Some("PGRST102"), "row must be a JSON object"));
        };
        if !object.get("id").is_some_and(|v| !v.is_null()) {
            object.insert("id".to_string(), json!(uuid::Uuid::new_v4()));
        }
        object
            .entry("created_at")
            .or_insert_with(|| json!(Utc::now()));

        let rows = self.table_mut(table)?;
        for key in std::iter::once(&["id"][..]).chain(unique_keys(table).iter().copied()) {
            if rows.iter().any(|existing| same_key(existing, &object, key)) {
                return Err(BackendError::api(
                    409,
                    Some("23505"),
                    format!(
                        "duplicate key value violates unique constraint \"{}_{}_key\"",
                        table,
                        key.join("_")
                    ),
                ));
            }
        }

        let row = Value::Object(object);
        rows.push(row.clone());
        Ok(row)
    }
}

fn missing_relation(table: Table) -> BackendError {
    BackendError::api(
        404,
        Some("42P01"),
        format!("relation \"public.{table}\" does not exist"),
    )
}

fn same_key(existing: &Value, candidate: &Map<String, Value>, columns: &[&str]) -> bool {
    columns.iter().all(|column| {
        match (existing.get(*column), candidate.get(*column)) {
            (Some(a), Some(b)) if !a.is_null() && !b.is_null() => filter_text(a) == filter_text(b),
            _ => false,
        }
    })
}

/// Orders column values the way Postgres would for their types: numbers
/// numerically, timestamps chronologically, anything else as text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    if let (Some(Value::Number(x)), Some(Value::Number(y))) = (a, b) {
        if let (Some(x), Some(y)) = (x.as_f64(), y.as_f64()) {
            return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        }
    }
    if let (Some(Value::String(x)), Some(Value::String(y))) = (a, b) {
        if let (Ok(x), Ok(y)) = (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
            return x.cmp(&y);
        }
    }
    let text = |v: Option<&Value>| v.map(filter_text).unwrap_or_default();
    text(a).cmp(&text(b))
}

/// Table named by a `CREATE TABLE [IF NOT EXISTS] [public.]name` statement.
fn created_table(sql: &str) -> Option<(&str, bool)> {
    let words: Vec<&str> = sql.split_whitespace().collect();
    let upper: Vec<String> = words.iter().map(|w| w.to_ascii_uppercase()).collect();
    if upper.len() < 3 || upper[0] != "CREATE" || upper[1] != "TABLE" {
        return None;
    }
    let (name, if_not_exists) = if upper.len() >= 6 && upper[2..5] == ["IF", "NOT", "EXISTS"] {
        (words[5], true)
    } else {
        (words[2], false)
    };
    let name = name.split('(').next().unwrap_or(name);
    let name = name.strip_prefix("public.").unwrap_or(name);
    Some((name.trim_matches('"'), if_not_exists))
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, BackendError> {
        let mut state = self.lock();
        state.check_available()?;
        let mut rows: Vec<Value> = state
            .table_mut(table)?
            .iter()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();

        if let Some((column, ascending)) = query.order() {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(column), b.get(column));
                if ascending { ordering } else { ordering.reverse() }
            });
        }
        if let Some(limit) = query.row_limit() {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError> {
        let mut state = self.lock();
        state.check_available()?;
        state.insert_row(table, row)
    }

    async fn update(
        &self,
        table: Table,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, BackendError> {
        let mut state = self.lock();
        state.check_available()?;
        let Value::Object(patch) = patch else {
            return Err(BackendError::api(400, Some("PGRST102"), "patch must be a JSON object"));
        };

        let mut updated = Vec::new();
        for row in state.table_mut(table)?.iter_mut() {
            if !query.matches(row) {
                continue;
            }
            if let Value::Object(object) = row {
                for (key, value) in &patch {
                    object.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<AuthUser>, BackendError> {
        let state = self.lock();
        state.check_available()?;
        let skip = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        Ok(state
            .users
            .iter()
            .skip(skip)
            .take(per_page as usize)
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, BackendError> {
        let mut state = self.lock();
        state.check_available()?;

        if state.failing_user_creations > 0 {
            state.failing_user_creations -= 1;
            return Err(BackendError::api(
                500,
                Some("unexpected_failure"),
                "Database error creating new user",
            ));
        }
        if state.users.iter().any(|stored| stored.user.has_email(&user.email)) {
            return Err(BackendError::api(
                422,
                Some("email_exists"),
                "A user with this email address has already been registered",
            ));
        }

        let created = AuthUser {
            id: ProfileId::new(),
            email: Some(user.email.clone()),
            user_metadata: user.user_metadata.clone(),
            created_at: Some(Utc::now()),
        };

        if state.profile_trigger && state.tables.contains_key(&Table::Profiles) {
            let role = created
                .metadata_role()
                .map(|r| r.as_str())
                .unwrap_or("customer");
            let profile = json!({
                "id": created.id,
                "email": user.email,
                "full_name": created.metadata_full_name(),
                "role": role,
                "is_active": true,
                "barbershop_id": null,
            });
            state.insert_row(Table::Profiles, profile)?;
        }

        state.users.push(StoredUser {
            user: created.clone(),
            password: user.password.clone(),
        });
        Ok(created)
    }

    async fn delete_user(&self, id: ProfileId) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.check_available()?;
        let before = state.users.len();
        state.users.retain(|stored| stored.user.id != id);
        if state.users.len() == before {
            return Err(BackendError::api(404, Some("user_not_found"), "User not found"));
        }

        // Profiles reference auth accounts with ON DELETE CASCADE, barbers
        // reference profiles the same way.
        let id = id.to_string();
        if let Some(profiles) = state.tables.get_mut(&Table::Profiles) {
            profiles.retain(|row| row.get("id").map(filter_text).as_deref() != Some(id.as_str()));
        }
        if let Some(barbers) = state.tables.get_mut(&Table::Barbers) {
            barbers.retain(|row| {
                row.get("profile_id").map(filter_text).as_deref() != Some(id.as_str())
            });
        }
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let state = self.lock();
        state.check_available()?;
        state
            .users
            .iter()
            .find(|stored| stored.user.has_email(email) && stored.password == password)
            .map(|stored| AuthSession {
                access_token: format!("memory-token-{}", stored.user.id),
                user: stored.user.clone(),
            })
            .ok_or_else(|| {
                BackendError::api(400, Some("invalid_credentials"), "Invalid login credentials")
            })
    }
}

#[async_trait]
impl SqlExecutor for MemoryBackend {
    async fn execute_sql(&self, sql: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.check_available()?;
        if !state.exec_sql_installed {
            return Err(BackendError::api(
                404,
                Some("PGRST202"),
                "Could not find the function public.exec_sql(sql) in the schema cache",
            ));
        }
        state.executed.push(sql.to_string());

        let Some((table, if_not_exists)) = created_table(sql).and_then(|(name, if_not_exists)| {
            Table::from_name(name).map(|table| (table, if_not_exists))
        }) else {
            return Ok(());
        };
        match (state.tables.contains_key(&table), if_not_exists) {
            (true, true) => Ok(()),
            (true, false) => Err(BackendError::api(
                400,
                Some("42P07"),
                format!("relation \"{table}\" already exists"),
            )),
            (false, _) => {
                state.tables.insert(table, Vec::new());
                Ok(())
            }
        }
    }

    fn describe(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn new_user(email: &str) -> NewAuthUser {
        NewAuthUser {
            email: email.to_string(),
            password: "123456".to_string(),
            email_confirm: true,
            user_metadata: json!({"full_name": "Barbeiro Teste", "role": "barber"}),
        }
    }

    #[tokio::test]
    async fn test_missing_table_is_missing_relation() {
        let backend = MemoryBackend::new();
        let err = backend.select(Table::Profiles, &Query::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRelation);
    }

    #[tokio::test]
    async fn test_order_by_compares_timestamps_and_numbers() {
        let backend = MemoryBackend::with_schema();
        backend.put_row(
            Table::Appointments,
            json!({"id": "late", "created_at": "2026-01-01T00:00:00.5Z", "price": 9}),
        );
        backend.put_row(
            Table::Appointments,
            json!({"id": "early", "created_at": "2026-01-01T00:00:00Z", "price": 10}),
        );
        let ids = |rows: Vec<Value>| -> Vec<String> {
            rows.iter().map(|r| r["id"].as_str().unwrap_or_default().to_string()).collect()
        };

        let by_time = Query::new().order_by("created_at", true);
        let rows = backend.select(Table::Appointments, &by_time).await.unwrap();
        assert_eq!(ids(rows), ["early", "late"]);

        let by_price = Query::new().order_by("price", false);
        let rows = backend.select(Table::Appointments, &by_price).await.unwrap();
        assert_eq!(ids(rows), ["early", "late"]);
    }

    #[tokio::test]
    async fn test_insert_generates_id_and_enforces_unique_keys() {
        let backend = MemoryBackend::with_schema();
        let row = json!({"barber_id": "b1", "day_of_week": 1, "is_available": true});

        let stored = backend.insert(Table::WorkingHours, row.clone()).await.unwrap();
        assert!(stored.get("id").is_some());

        let err = backend.insert(Table::WorkingHours, row).await.unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(backend.row_count(Table::WorkingHours), 1);
    }

    #[tokio::test]
    async fn test_select_filters_orders_and_limits() {
        let backend = MemoryBackend::with_schema();
        for name in ["Corte", "Barba", "Corte + Barba"] {
            backend
                .insert(Table::Services, json!({"barbershop_id": "s1", "name": name}))
                .await
                .unwrap();
        }

        let rows = backend
            .select(
                Table::Services,
                &Query::new().eq("barbershop_id", "s1").order_by("name", true).limit(2),
            )
            .await
            .unwrap();

        let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Barba", "Corte"]);
    }

    #[tokio::test]
    async fn test_update_patches_matching_rows() {
        let backend = MemoryBackend::with_schema();
        backend.put_row(Table::Profiles, json!({"id": "p1", "role": "customer"}));
        backend.put_row(Table::Profiles, json!({"id": "p2", "role": "customer"}));

        let updated = backend
            .update(Table::Profiles, &Query::new().eq("id", "p1"), json!({"role": "admin"}))
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(backend.rows(Table::Profiles)[0]["role"], "admin");
        assert_eq!(backend.rows(Table::Profiles)[1]["role"], "customer");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_already_exists() {
        let backend = MemoryBackend::with_schema();
        backend.create_user(&new_user("barbeiro@barberpro.com")).await.unwrap();

        let err = backend
            .create_user(&new_user("BARBEIRO@barberpro.com"))
            .await
            .unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_injected_failure_is_transient() {
        let backend = MemoryBackend::with_schema();
        backend.fail_next_user_creations(1);

        let err = backend.create_user(&new_user("a@b.com")).await.unwrap_err();
        assert!(err.is_transient());
        assert!(backend.create_user(&new_user("a@b.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_profile_trigger_copies_metadata() {
        let backend = MemoryBackend::with_schema();
        backend.enable_profile_trigger();

        let user = backend.create_user(&new_user("barbeiro@barberpro.com")).await.unwrap();

        let profiles = backend.rows(Table::Profiles);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0]["id"], json!(user.id));
        assert_eq!(profiles[0]["role"], "barber");
        assert_eq!(profiles[0]["full_name"], "Barbeiro Teste");
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let backend = MemoryBackend::with_schema();
        backend.enable_profile_trigger();
        let user = backend.create_user(&new_user("barbeiro@barberpro.com")).await.unwrap();
        backend
            .insert(Table::Barbers, json!({"profile_id": user.id, "barbershop_id": "s1"}))
            .await
            .unwrap();

        backend.delete_user(user.id).await.unwrap();

        assert_eq!(backend.user_count(), 0);
        assert_eq!(backend.row_count(Table::Profiles), 0);
        assert_eq!(backend.row_count(Table::Barbers), 0);
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let backend = MemoryBackend::with_schema();
        backend.create_user(&new_user("cliente@barberpro.com")).await.unwrap();

        assert!(backend.sign_in_with_password("cliente@barberpro.com", "123456").await.is_ok());
        let err = backend
            .sign_in_with_password("cliente@barberpro.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("invalid_credentials"));
    }

    #[tokio::test]
    async fn test_find_user_by_email_pages_through_users() {
        let backend = MemoryBackend::with_schema();
        backend.create_user(&new_user("admin@barberpro.com")).await.unwrap();

        let found = backend.find_user_by_email("Admin@BarberPro.com").await.unwrap();
        assert!(found.is_some());
        assert!(backend.find_user_by_email("nobody@barberpro.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exec_sql_creates_known_tables() {
        let backend = MemoryBackend::new();

        backend
            .execute_sql("CREATE TABLE IF NOT EXISTS public.profiles (\n  id UUID PRIMARY KEY\n)")
            .await
            .unwrap();
        assert!(backend.has_table(Table::Profiles));

        let err = backend
            .execute_sql("CREATE TABLE profiles (id UUID)")
            .await
            .unwrap_err();
        assert!(err.is_already_exists());

        backend.execute_sql("CREATE INDEX idx ON profiles(email)").await.unwrap();
        assert_eq!(backend.executed_statements().len(), 3);
    }

    #[tokio::test]
    async fn test_exec_sql_missing_function() {
        let backend = MemoryBackend::new();
        backend.set_exec_sql_installed(false);

        let err = backend.execute_sql("SELECT 1").await.unwrap_err();
        assert!(err.is_missing_function());
    }

    #[tokio::test]
    async fn test_unavailable_backend_is_transient() {
        let backend = MemoryBackend::with_schema();
        backend.set_unavailable(true);

        let err = backend.select(Table::Profiles, &Query::new()).await.unwrap_err();
        assert!(err.is_transient());
    }
}
