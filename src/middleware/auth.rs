use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use barberpro_auth::{Claims, verify_token};
use barberpro_config::JwtConfig;
use barberpro_core::AppError;
use barberpro_models::{ProfileId, UserRole};

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "barberpro_session";

/// A verified session read from the request's cookie.
#[derive(Debug, Clone)]
pub struct Session(pub Claims);

impl Session {
    /// Reads and verifies the session cookie. Missing, expired and tampered
    /// tokens all yield `None`.
    pub fn from_headers(headers: &HeaderMap, jwt_config: &JwtConfig) -> Option<Self> {
        let jar = CookieJar::from_headers(headers);
        let token = jar.get(SESSION_COOKIE)?.value().to_string();

        match verify_token(&token, jwt_config) {
            Ok(claims) => Some(Session(claims)),
            Err(e) => {
                debug!(error = %e.error, "discarding session cookie");
                None
            }
        }
    }

    pub fn profile_id(&self) -> ProfileId {
        self.0.sub
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Session::from_headers(&parts.headers, &state.jwt_config)
            .ok_or_else(|| AppError::unauthorized("Not signed in".to_string()))
    }
}

impl OptionalFromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(Session::from_headers(&parts.headers, &state.jwt_config))
    }
}

/// HttpOnly cookie carrying a freshly issued session token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that, once removed from the jar, clears the session in the browser.
pub fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
