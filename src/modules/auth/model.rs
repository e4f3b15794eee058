use serde::Deserialize;
use validator::Validate;

use barberpro_models::{ProfileId, UserRole};

// Login form, posted URL-encoded from the login page
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email(message = "Informe um e-mail válido"))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter pelo menos 6 caracteres"))]
    pub password: String,
}

// Identity established by a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub profile_id: ProfileId,
    pub email: String,
    pub role: UserRole,
}
