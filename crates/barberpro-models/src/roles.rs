//! User roles.
//!
//! A profile carries exactly one role, and every role owns exactly one
//! dashboard in the web app.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Barber,
    Customer,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Barber, UserRole::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Barber => "barber",
            UserRole::Customer => "customer",
        }
    }

    /// The single dashboard a user with this role lands on.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin",
            UserRole::Barber => "/barber",
            UserRole::Customer => "/customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for UserRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "barber" => Ok(UserRole::Barber),
            "customer" => Ok(UserRole::Customer),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}
