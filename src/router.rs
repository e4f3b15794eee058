use axum::http::{HeaderValue, header};
use axum::{Router, middleware};
use tower_http::set_header::SetResponseHeaderLayer;

use barberpro_observability::logging_middleware;

use crate::middleware::role::{require_admin, require_barber, require_customer};
use crate::modules::auth::router::init_auth_router;
use crate::modules::dashboard::router::{
    init_admin_router, init_barber_router, init_customer_router,
};
use crate::modules::home::controller::fallback;
use crate::modules::home::router::init_home_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(init_home_router())
        .nest("/auth", init_auth_router())
        .nest(
            "/admin",
            init_admin_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .nest(
            "/barber",
            init_barber_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_barber)),
        )
        .nest(
            "/customer",
            init_customer_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_customer)),
        )
        .fallback(fallback)
        .with_state(state)
        // Pages depend on the session cookie.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(middleware::from_fn(logging_middleware))
}
