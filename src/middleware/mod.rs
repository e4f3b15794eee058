//! Session handling for the web app.
//!
//! # Modules
//!
//! - [`auth`]: the [`auth::Session`] extractor and the session cookie helpers
//! - [`role`]: the role gate placed in front of each dashboard
//!
//! # Flow
//!
//! 1. Sign-in stores a signed JWT in the `barberpro_session` cookie
//! 2. Every request re-reads and verifies that cookie; nothing is cached
//! 3. The gate redirects anonymous users to the login page and users with
//!    another role to their own dashboard
//! 4. Authorized requests reach the handler with `Extension<Session>`
//!
//! # Example
//!
//! ```ignore
//! use axum::Extension;
//! use crate::middleware::auth::Session;
//!
//! async fn dashboard(Extension(session): Extension<Session>) -> String {
//!     format!("signed in as {}", session.email())
//! }
//! ```

pub mod auth;
pub mod role;
