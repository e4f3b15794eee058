use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{admin_dashboard, barber_dashboard, customer_dashboard};

pub fn init_admin_router() -> Router<AppState> {
    Router::new().route("/", get(admin_dashboard))
}

pub fn init_barber_router() -> Router<AppState> {
    Router::new().route("/", get(barber_dashboard))
}

pub fn init_customer_router() -> Router<AppState> {
    Router::new().route("/", get(customer_dashboard))
}
