//! # BarberPro Auth
//!
//! Session tokens for the BarberPro web app.
//!
//! After a successful password sign-in against the backend the web app issues
//! its own short JWT carrying the profile id and role. The token lives in an
//! HttpOnly cookie and is verified on every request by the session extractor.
//!
//! - [`claims`]: the session claim structure
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use barberpro_auth::{create_session_token, verify_token};
//! use barberpro_config::JwtConfig;
//! use barberpro_models::UserRole;
//!
//! let config = JwtConfig::from_env();
//! let token = create_session_token(profile_id, "barbeiro@barberpro.com", UserRole::Barber, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, UserRole::Barber);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_session_token, verify_token};
