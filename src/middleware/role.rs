//! Role gate for the dashboards.
//!
//! The gate never renders an error page: anonymous visitors go to the login
//! page and signed-in users with another role go to their own dashboard.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use barberpro_models::UserRole;

use crate::middleware::auth::Session;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/auth/login";

/// Decides where a request goes.
///
/// Returns the session when its role is allowed, otherwise the path to
/// redirect to.
pub fn authorize(session: Option<Session>, allowed_roles: &[UserRole]) -> Result<Session, &'static str> {
    match session {
        None => Err(LOGIN_PATH),
        Some(session) if allowed_roles.contains(&session.role()) => Ok(session),
        Some(session) => Err(session.role().dashboard_path()),
    }
}

/// Middleware body shared by the per-role wrappers.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let admin_routes = init_admin_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Response {
    let session = Session::from_headers(req.headers(), &state.jwt_config);

    match authorize(session, allowed_roles) {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(target) => {
            debug!(path = %req.uri().path(), redirect = target, "redirecting by role gate");
            Redirect::to(target).into_response()
        }
    }
}

pub async fn require_admin(state: State<AppState>, req: Request, next: Next) -> Response {
    require_roles(state, req, next, &[UserRole::Admin]).await
}

pub async fn require_barber(state: State<AppState>, req: Request, next: Next) -> Response {
    require_roles(state, req, next, &[UserRole::Barber]).await
}

pub async fn require_customer(state: State<AppState>, req: Request, next: Next) -> Response {
    require_roles(state, req, next, &[UserRole::Customer]).await
}
