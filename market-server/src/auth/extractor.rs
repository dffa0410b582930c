//! Bearer-token extractor
//!
//! Handlers that take a [`CurrentUser`] argument require a valid JWT.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::not_authenticated());
            }
        };

        let user = authenticate(state.jwt_service(), token, &parts.uri.to_string())?;
        // Presence for the online filter
        if let Err(e) = state
            .accounts
            .touch_last_seen(&user.id, shared::util::now_millis())
        {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to record presence");
        }
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Validate a raw token (header or `?token=` query)
pub fn authenticate(jwt: &JwtService, token: &str, uri: &str) -> Result<CurrentUser, AppError> {
    match jwt.validate_token(token) {
        Ok(claims) => Ok(CurrentUser::from(claims)),
        Err(e) => {
            security_log!("WARN", "auth_failed", error = e.to_string(), uri = uri);
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}
