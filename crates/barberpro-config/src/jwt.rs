use std::env;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secret: lookup("JWT_SECRET")
                .unwrap_or_else(|| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: lookup("JWT_ACCESS_EXPIRY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(28800), // 8 hours
        }
    }
}
