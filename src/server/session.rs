use super::error::ApiError;
use super::state::ServerState;
use crate::user::{PublicUser, TokenKind};

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;

pub const COOKIE_ACCESS_TOKEN: &str = "accessToken";
pub const COOKIE_REFRESH_TOKEN: &str = "refreshToken";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// Authenticated identity for the current request, loaded without secret
/// fields. Produced by the extractor and passed explicitly into handlers.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: PublicUser,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

async fn extract_token_from_cookies(parts: &mut Parts, ctx: &ServerState) -> Option<String> {
    CookieJar::from_request_parts(parts, ctx)
        .await
        .ok()?
        .get(COOKIE_ACCESS_TOKEN)
        .map(Cookie::value)
        .map(|s| s.to_string())
}

fn extract_token_from_headers(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(HEADER_AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).to_string())
}

async fn extract_session(parts: &mut Parts, ctx: &ServerState) -> Result<Session, ApiError> {
    let token = match extract_token_from_cookies(parts, ctx).await {
        Some(token) => token,
        None => extract_token_from_headers(parts)
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized request".to_owned()))?,
    };

    let claims = ctx
        .token_service
        .verify(&token, TokenKind::Access)
        .map_err(|err| {
            debug!("Access token rejected: {}", err);
            ApiError::Unauthorized("Invalid access token".to_owned())
        })?;

    let user = ctx
        .store
        .get_user(&claims.sub)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid access token".to_owned()))?;

    Ok(Session { user: user.into() })
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session(parts, ctx).await
    }
}

impl OptionalFromRequestParts<ServerState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(extract_session(parts, ctx).await.ok())
    }
}
