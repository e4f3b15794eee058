//! # BarberPro Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`backend`]: hosted backend URL and API keys
//! - [`jwt`]: session token signing configuration
//! - [`server`]: web server bind address
//!
//! Every config type offers `from_env()` and a `from_lookup()` constructor that
//! takes any `Fn(&str) -> Option<String>`, which keeps tests away from the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use barberpro_config::{BackendConfig, JwtConfig, ServerConfig};
//!
//! let backend = BackendConfig::from_env()?;
//! let jwt = JwtConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod backend;
pub mod jwt;
pub mod server;

pub use backend::{BackendConfig, ConfigError};
pub use jwt::JwtConfig;
pub use server::ServerConfig;
