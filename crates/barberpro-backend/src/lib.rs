//! # BarberPro Backend
//!
//! Thin authenticated handle to the hosted Postgres-as-a-service backend.
//!
//! The backend is an opaque collaborator exposing three surfaces:
//!
//! - row CRUD per table (PostgREST, `/rest/v1/{table}`)
//! - an admin user-management API (GoTrue, `/auth/v1/admin/users`)
//! - an arbitrary-SQL RPC endpoint (`/rest/v1/rpc/exec_sql`)
//!
//! [`Backend`] abstracts the first two, [`SqlExecutor`] the third. The
//! [`RestBackend`] implements both over HTTP. With the `test-utils` feature a
//! [`memory::MemoryBackend`] is available for tests.
//!
//! # Example
//!
//! ```ignore
//! use barberpro_backend::{RestBackend, Query, rows};
//! use barberpro_models::{Profile, Table};
//!
//! let backend = RestBackend::new(&config)?;
//! let admins: Vec<Profile> =
//!     rows::fetch_all(&backend, Table::Profiles, &Query::new().eq("role", "admin")).await?;
//! ```

pub mod auth_users;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod query;
pub mod rest;
pub mod retry;
pub mod rows;
pub mod traits;

pub use auth_users::{AuthSession, AuthUser, NewAuthUser};
pub use error::{ApiErrorBody, BackendError, ErrorKind};
pub use query::Query;
pub use rest::RestBackend;
pub use retry::RetryPolicy;
pub use traits::{Backend, SqlExecutor};
