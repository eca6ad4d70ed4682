//! Request principal extractors.
//!
//! The `session` cookie is resolved against the sessions table on every
//! request. [`Authenticated`] rejects requests without a live session;
//! [`AdminPrincipal`] additionally rejects non-admins.

use crate::{
    core::session::{self, Principal},
    errors::Error,
    web::AppState,
};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::debug;

/// Name of the cookie carrying the session key.
pub const SESSION_COOKIE: &str = "session";

/// Reads the session key from the request cookies.
#[must_use]
pub fn session_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that stores `key`.
#[must_use]
pub fn session_cookie(key: &str) -> String {
    format!("{SESSION_COOKIE}={key}; HttpOnly; Path=/; SameSite=Lax")
}

/// `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// Any logged-in user.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

/// A logged-in admin.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(key) = session_key(&parts.headers) else {
            return Err(Error::Unauthenticated);
        };
        match session::resolve_principal(&state.db, &key).await? {
            Some(principal) => Ok(Self(principal)),
            None => {
                debug!("Stale session cookie");
                Err(Error::Unauthenticated)
            }
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;
        principal.require_admin()?;
        Ok(Self(principal))
    }
}
