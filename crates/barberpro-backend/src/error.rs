//! Backend error type and its classification.
//!
//! Every caller in the tooling makes decisions on the *kind* of failure rather
//! than on its text: an "already exists" answer is the idempotent steady
//! state, a missing relation is a health issue, a transient failure may be
//! retried. [`BackendError::kind`] discriminates on the SQLSTATE / PostgREST /
//! GoTrue error code first and falls back to the message text.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Object or row already present (`42P07`, `42710`, `42P06`, `23505`, `email_exists`).
    AlreadyExists,
    /// Table/relation absent (`42P01`, `PGRST205`).
    MissingRelation,
    /// The `exec_sql` helper function is not installed (`PGRST202`).
    MissingFunction,
    /// Connectivity problems, 5xx, 429 and the auth service's
    /// "Database error creating new user".
    Transient,
    Unauthorized,
    Other,
}

/// Error payload as returned by PostgREST (`code`, `message`, `details`,
/// `hint`) or GoTrue (`error_code`, `msg`, `error_description`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiErrorBody {
    pub code: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl ApiErrorBody {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    /// Parses an error response body, falling back to the raw text.
    pub fn parse(text: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            return Self::new(None, text.trim());
        };

        let str_field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

        // GoTrue sends a numeric `code` (the HTTP status) next to a string `error_code`.
        // OAuth-style bodies pair `error` (the code) with `error_description`.
        let code = str_field("code").or_else(|| str_field("error_code")).or_else(|| {
            value
                .get("error_description")
                .and_then(|_| str_field("error"))
        });
        let message = str_field("message")
            .or_else(|| str_field("msg"))
            .or_else(|| str_field("error_description"))
            .or_else(|| str_field("error"))
            .unwrap_or_else(|| text.trim().to_string());

        Self {
            code,
            message,
            details: str_field("details"),
            hint: str_field("hint"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend returned {status}: {}", .body.message)]
    Api {
        status: u16,
        body: ApiErrorBody,
        retry_after: Option<Duration>,
    },

    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn api(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: ApiErrorBody::new(code, message),
            retry_after: None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Api { body, .. } => body.code.as_deref(),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BackendError::Api { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::Transport(err) if err.is_decode() => ErrorKind::Other,
            BackendError::Transport(_) | BackendError::Unavailable(_) => ErrorKind::Transient,
            BackendError::Decode(_) => ErrorKind::Other,
            BackendError::Api { status, body, .. } => classify(*status, body),
        }
    }

    pub fn is_already_exists(&self) -> bool {
        self.kind() == ErrorKind::AlreadyExists
    }

    pub fn is_missing_relation(&self) -> bool {
        self.kind() == ErrorKind::MissingRelation
    }

    pub fn is_missing_function(&self) -> bool {
        self.kind() == ErrorKind::MissingFunction
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

fn classify(status: u16, body: &ApiErrorBody) -> ErrorKind {
    let message = body.message.to_lowercase();

    match body.code.as_deref() {
        Some("42P07" | "42710" | "42P06" | "23505" | "email_exists" | "user_already_exists") => {
            return ErrorKind::AlreadyExists;
        }
        Some("42P01" | "PGRST205") => return ErrorKind::MissingRelation,
        Some("PGRST202") => return ErrorKind::MissingFunction,
        Some("42883") if message.contains("exec_sql") => return ErrorKind::MissingFunction,
        _ => {}
    }

    if message.contains("already exists")
        || message.contains("duplicate key")
        || message.contains("already been registered")
    {
        return ErrorKind::AlreadyExists;
    }
    if message.contains("database error creating new user") {
        return ErrorKind::Transient;
    }
    if message.contains("relation") && message.contains("does not exist") {
        return ErrorKind::MissingRelation;
    }
    if message.contains("could not find the function") {
        return ErrorKind::MissingFunction;
    }

    match status {
        401 | 403 => ErrorKind::Unauthorized,
        408 | 429 | 500..=599 => ErrorKind::Transient,
        _ => ErrorKind::Other,
    }
}
