use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use barberpro_auth::create_session_token;
use barberpro_core::AppError;

use crate::middleware::auth::{Session, cleared_session_cookie, session_cookie};
use crate::middleware::role::LOGIN_PATH;
use crate::state::AppState;
use crate::validator::{FieldErrors, ValidatedForm};

use super::model::LoginForm;
use super::service::AuthService;
use super::view;

/// Login form, or the dashboard when already signed in
#[instrument(skip_all)]
pub async fn login_page(session: Option<Session>) -> Response {
    match session {
        Some(session) => Redirect::to(session.role().dashboard_path()).into_response(),
        None => view::login_page(&LoginForm::default(), &FieldErrors::default(), None).into_response(),
    }
}

/// Sign in with e-mail and password
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedForm { value: form, errors }: ValidatedForm<LoginForm>,
) -> Result<Response, AppError> {
    if !errors.is_empty() {
        let page = view::login_page(&form, &errors, None);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let signed_in = match AuthService::sign_in(state.backend.as_ref(), &form).await {
        Ok(signed_in) => signed_in,
        Err(err) => {
            warn!(error = %err, "sign-in failed");
            let page = view::login_page(&form, &errors, Some(&err.to_string()));
            return Ok((err.status(), page).into_response());
        }
    };

    let token = create_session_token(
        signed_in.profile_id,
        &signed_in.email,
        signed_in.role,
        &state.jwt_config,
    )?;
    info!(user_id = %signed_in.profile_id, role = %signed_in.role, "signed in");

    Ok((
        jar.add(session_cookie(token)),
        Redirect::to(signed_in.role.dashboard_path()),
    )
        .into_response())
}

/// Clear the session cookie
#[instrument(skip_all)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.remove(cleared_session_cookie()), Redirect::to(LOGIN_PATH))
}
