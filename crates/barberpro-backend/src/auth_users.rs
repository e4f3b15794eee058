//! Backend-auth account shapes (admin API and password sign-in).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use barberpro_models::{ProfileId, UserRole};

/// An account in the backend's auth service. Its id doubles as the profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: ProfileId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AuthUser {
    /// Role stored in the account metadata at sign-up, if any.
    pub fn metadata_role(&self) -> Option<UserRole> {
        self.user_metadata
            .get("role")
            .and_then(Value::as_str)
            .and_then(|r| r.parse().ok())
    }

    pub fn metadata_full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(Value::as_str)
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case(email))
    }
}

/// Payload for the admin create-user call.
#[derive(Debug, Clone, Serialize)]
pub struct NewAuthUser {
    pub email: String,
    pub password: String,
    pub email_confirm: bool,
    pub user_metadata: Value,
}

/// Result of a password sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}
