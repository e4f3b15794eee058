use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::{instrument, warn};

use barberpro_cli::health::check_health;

use crate::middleware::auth::Session;
use crate::middleware::role::LOGIN_PATH;
use crate::state::AppState;

use super::view;

#[instrument(skip_all)]
pub async fn landing(session: Option<Session>) -> Html<String> {
    view::landing(session.as_ref())
}

/// Backend connectivity and schema report
#[instrument(skip_all)]
pub async fn connection_test(State(state): State<AppState>, session: Option<Session>) -> Response {
    let result = check_health(state.backend.as_ref()).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            warn!(error = %err, "connection test failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    (status, view::health(session.as_ref(), &result)).into_response()
}

/// Unknown paths land on the login page.
pub async fn fallback() -> Redirect {
    Redirect::to(LOGIN_PATH)
}
