use std::env;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0} (also accepted as VITE_{0})")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection settings for the hosted database/auth backend.
///
/// The anonymous key is used for end-user sign-in. The service-role key is
/// required by the administrative tooling (migrations, seeding, admin user API)
/// and bypasses row-level security.
#[derive(Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
}

impl BackendConfig {
    pub const URL_VAR: &'static str = "SUPABASE_URL";
    pub const ANON_KEY_VAR: &'static str = "SUPABASE_ANON_KEY";
    pub const SERVICE_ROLE_KEY_VAR: &'static str = "SUPABASE_SERVICE_ROLE_KEY";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Front-end style `VITE_` names are accepted so one .env serves both.
        let read = |name: &'static str| {
            lookup(name)
                .or_else(|| lookup(format!("VITE_{name}").as_str()))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let url = read(Self::URL_VAR).ok_or(ConfigError::Missing(Self::URL_VAR))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: Self::URL_VAR,
                reason: format!("expected an http(s) URL, got `{url}`"),
            });
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: read(Self::ANON_KEY_VAR).ok_or(ConfigError::Missing(Self::ANON_KEY_VAR))?,
            service_role_key: read(Self::SERVICE_ROLE_KEY_VAR),
        })
    }

    /// Fails when the service-role key is absent; administrative callers check
    /// this at start-up.
    pub fn require_service_role(&self) -> Result<&str, ConfigError> {
        self.service_role_key
            .as_deref()
            .ok_or(ConfigError::Missing(Self::SERVICE_ROLE_KEY_VAR))
    }
}

// Keys stay out of logs.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
