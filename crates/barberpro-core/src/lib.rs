//! # BarberPro Core
//!
//! Foundational types shared by the BarberPro web application.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use barberpro_core::errors::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Profile not found"));
//! ```

pub mod errors;

pub use errors::AppError;
