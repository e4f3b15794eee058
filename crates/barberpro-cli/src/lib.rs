//! # BarberPro CLI
//!
//! Maintenance tooling for the BarberPro backend, used by the `barberpro-cli`
//! binary and reusable from tests:
//!
//! - [`health`]: detects missing tables and missing default data
//! - [`migrate`]: splits the bundled schema script and applies it statement by statement
//! - [`seeder`]: idempotent test accounts, catalogue, schedules and sample appointments
//! - [`setup`]: the full check, migrate, pre-seed and seed flow
//!
//! ## Usage
//!
//! ```ignore
//! use barberpro_cli::health::check_health;
//!
//! let report = check_health(&backend).await?;
//! if !report.healthy() {
//!     for issue in &report.issues {
//!         println!("{issue}");
//!     }
//! }
//! ```

pub mod health;
pub mod migrate;
pub mod seeder;
pub mod setup;

/// Schema script applied by `auto-migrate` when no `--file` is given.
pub const BUNDLED_SCHEMA: &str = include_str!("../sql/schema.sql");
