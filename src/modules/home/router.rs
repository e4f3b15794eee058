use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{connection_test, landing};

pub fn init_home_router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/test", get(connection_test))
}
