use axum::http::StatusCode;
use thiserror::Error;
use tracing::{instrument, warn};

use barberpro_backend::{AuthUser, Backend, BackendError, Query, rows};
use barberpro_models::{Profile, Table, UserRole};

use super::model::{LoginForm, SignedIn};

#[derive(Debug, Error)]
pub enum SignInError {
    #[error("E-mail ou senha incorretos")]
    InvalidCredentials,
    #[error("Erro ao entrar: {0}")]
    Rejected(String),
    #[error("Não foi possível conectar ao servidor. Tente novamente em instantes.")]
    Unavailable(#[source] BackendError),
    #[error("Erro ao entrar: {0}")]
    Backend(#[source] BackendError),
}

impl SignInError {
    pub fn status(&self) -> StatusCode {
        match self {
            SignInError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            SignInError::Rejected(_) => StatusCode::BAD_REQUEST,
            SignInError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SignInError::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<BackendError> for SignInError {
    fn from(err: BackendError) -> Self {
        if err.is_transient() {
            return SignInError::Unavailable(err);
        }

        match err {
            BackendError::Api { ref body, .. }
                if matches!(body.code.as_deref(), Some("invalid_credentials" | "invalid_grant")) =>
            {
                SignInError::InvalidCredentials
            }
            // Unconfirmed e-mail, disabled provider and the like: show the service's own words.
            BackendError::Api { status: 400 | 422, body, .. } => SignInError::Rejected(body.message),
            err => SignInError::Backend(err),
        }
    }
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip_all)]
    pub async fn sign_in(backend: &dyn Backend, form: &LoginForm) -> Result<SignedIn, SignInError> {
        let email = form.email.trim();
        let session = backend.sign_in_with_password(email, &form.password).await?;
        let role = Self::resolve_role(backend, &session.user).await;

        Ok(SignedIn {
            profile_id: session.user.id,
            email: session.user.email.clone().unwrap_or_else(|| email.to_string()),
            role,
        })
    }

    /// Role from the profile row, then from the account metadata, then customer.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn resolve_role(backend: &dyn Backend, user: &AuthUser) -> UserRole {
        let by_id = Query::new().eq("id", user.id);
        let fallback = || user.metadata_role().unwrap_or(UserRole::Customer);

        match rows::fetch_optional::<_, Profile>(backend, Table::Profiles, &by_id).await {
            Ok(Some(profile)) => profile.role,
            Ok(None) => fallback(),
            Err(err) => {
                warn!(error = %err, "profile lookup failed, using account metadata");
                fallback()
            }
        }
    }
}
