use std::{
    convert::Infallible,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use lectern_identity::Session;
use serde::{Deserialize, Serialize};

use crate::{config::JwtConfig, error::AppError, routes::AppState};

pub const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    sub: String,
}

pub fn generate_token(config: &JwtConfig, sub: String) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        aud: config.audience.to_owned(),
        exp: now + config.expiration_days * 24 * 60 * 60,
        iat: now,
        iss: config.issuer.to_owned(),
        sub,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Subject of a valid token, `None` for anything expired, forged or foreign.
pub fn verify_token(config: &JwtConfig, token: &str) -> Option<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[config.audience.to_owned()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims.sub)
}

pub fn build_cookie(config: &JwtConfig, sub: String) -> anyhow::Result<Cookie<'static>> {
    let token = generate_token(config, sub)?;

    Ok(Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build())
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, "")).path("/").build()
}

async fn current_session(jar: &CookieJar, state: &AppState) -> Result<Option<Session>, AppError> {
    let Some(token) = jar.get(AUTH_COOKIE_NAME).map(|cookie| cookie.value()) else {
        return Ok(None);
    };

    let Some(user_id) = verify_token(&state.config.jwt, token) else {
        return Ok(None);
    };

    Ok(state.identity_query.find_session(user_id).await?)
}

fn continuation(parts: &Parts) -> String {
    parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| parts.uri.path().to_owned())
}

/// Signed-in user. Anonymous visitors are redirected to the login page,
/// carrying the current path as continuation.
pub struct AuthUser(pub Session);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        match current_session(&jar, state).await {
            Ok(Some(session)) => Ok(AuthUser(session)),
            Ok(None) => Err(
                Redirect::to(&lectern_identity::login_redirect(&continuation(parts)))
                    .into_response(),
            ),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// Session when there is one. Handlers decide what anonymous visitors get.
pub struct MaybeAuthUser(pub Option<Session>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        match current_session(&jar, state).await {
            Ok(session) => Ok(MaybeAuthUser(session)),
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}

/// Verifies the caller is an admin and exposes their [`Session`] as a
/// request extension.
pub async fn admin_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(session) = current_session(&jar, &state).await? else {
        tracing::warn!("admin route requested without a session");
        return Err(AppError::unauthorized());
    };

    if !session.is_admin() {
        tracing::error!(
            user_id = %session.user_id,
            "non-admin user attempted to access admin route"
        );
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_owned(),
            expiration_days: 7,
            issuer: "lectern".to_owned(),
            audience: "lectern-web".to_owned(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = config("test_secret_key_minimum_32_characters_long");
        let token = generate_token(&config, "user-1".to_owned()).unwrap();

        assert_eq!(verify_token(&config, &token).as_deref(), Some("user-1"));
    }

    #[test]
    fn test_token_from_another_secret_is_rejected() {
        let issued = config("test_secret_key_minimum_32_characters_long");
        let token = generate_token(&issued, "user-1".to_owned()).unwrap();

        let other = config("another_secret_key_minimum_32_characters");
        assert!(verify_token(&other, &token).is_none());

        let mut foreign = issued.clone();
        foreign.audience = "somebody-else".to_owned();
        assert!(verify_token(&foreign, &token).is_none());

        assert!(verify_token(&issued, "not-a-token").is_none());
    }

    #[test]
    fn test_cookie_is_http_only() {
        let config = config("test_secret_key_minimum_32_characters_long");
        let cookie = build_cookie(&config, "user-1".to_owned()).unwrap();

        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
