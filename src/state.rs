use std::sync::Arc;

use barberpro_backend::{Backend, RestBackend};
use barberpro_config::{BackendConfig, JwtConfig};

/// Shared state handed to every handler.
///
/// The backend sits behind a trait object so tests can run the full router
/// against an in-memory backend.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub jwt_config: JwtConfig,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, jwt_config: JwtConfig) -> Self {
        Self {
            backend,
            jwt_config,
        }
    }

    /// Builds the REST-backed state.
    ///
    /// Dashboards read rows on behalf of the signed-in user while the tables
    /// are guarded by row-level security keyed on `auth.uid()`. Under the
    /// anonymous key those reads come back empty, so the service-role key is
    /// required here rather than silently falling back.
    pub fn from_config(
        backend_config: &BackendConfig,
        jwt_config: JwtConfig,
    ) -> anyhow::Result<Self> {
        backend_config.require_service_role()?;
        let backend = RestBackend::new(backend_config)?;

        Ok(Self::new(Arc::new(backend), jwt_config))
    }
}

pub fn init_app_state() -> anyhow::Result<AppState> {
    AppState::from_config(&BackendConfig::from_env()?, JwtConfig::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barberpro_config::ConfigError;

    fn backend_config(service_role_key: Option<&str>) -> BackendConfig {
        BackendConfig {
            url: "http://localhost:54321".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: service_role_key.map(str::to_string),
        }
    }

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_service_role_key_is_required() {
        let err = match AppState::from_config(&backend_config(None), jwt_config()) {
            Ok(_) => panic!("state built without a service-role key"),
            Err(err) => err,
        };
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))
        );
    }

    #[test]
    fn test_state_with_service_role_key() {
        let state = AppState::from_config(&backend_config(Some("service")), jwt_config()).unwrap();
        assert_eq!(state.jwt_config.secret, "test-secret");
    }
}
