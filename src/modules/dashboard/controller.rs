use axum::Extension;
use axum::extract::State;
use axum::response::Html;
use tracing::instrument;

use barberpro_core::AppError;

use crate::middleware::auth::Session;
use crate::state::AppState;

use super::service::DashboardService;
use super::view;

/// Entity counts and the service catalogue
#[instrument(skip_all)]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Html<String>, AppError> {
    let overview = DashboardService::admin_overview(state.backend.as_ref())
        .await
        .map_err(AppError::upstream)?;
    Ok(view::admin(&session, &overview))
}

/// Weekly hours and appointments of the signed-in barber
#[instrument(skip_all)]
pub async fn barber_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Html<String>, AppError> {
    let agenda = DashboardService::barber_agenda(state.backend.as_ref(), session.profile_id())
        .await
        .map_err(AppError::upstream)?;
    Ok(view::barber(&session, &agenda))
}

/// Appointments of the signed-in customer and the active services
#[instrument(skip_all)]
pub async fn customer_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Html<String>, AppError> {
    let overview = DashboardService::customer_overview(state.backend.as_ref(), session.profile_id())
        .await
        .map_err(AppError::upstream)?;
    Ok(view::customer(&session, &overview))
}
