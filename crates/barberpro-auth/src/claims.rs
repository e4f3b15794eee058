//! JWT claims carried by the session cookie.

use serde::{Deserialize, Serialize};

use barberpro_models::{ProfileId, UserRole};

/// Claims of a signed-in session.
///
/// The role is captured at sign-in. A role change made afterwards takes effect
/// on the next sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Profile id (subject claim), equal to the backend auth account id.
    pub sub: ProfileId,
    pub email: String,
    pub role: UserRole,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}
