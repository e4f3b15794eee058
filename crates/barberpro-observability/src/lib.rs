//! BarberPro Observability
//!
//! - [`init_console_logging`]: tracing subscriber for the web app and CLI
//! - [`logging_middleware`]: per-request log line with request id and latency
//!
//! # Examples
//!
//! ```no_run
//! use axum::{Router, middleware, routing::get};
//! use barberpro_observability::{init_console_logging, logging_middleware};
//!
//! init_console_logging();
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "ok" }))
//!     .layer(middleware::from_fn(logging_middleware));
//! ```

pub mod console;
pub mod middleware;

pub use console::{LogFormat, default_filter, init_console_logging};
pub use middleware::logging_middleware;
