use super::{check_session, errors::AuthError, models::SessionUser};
use crate::{modules::extractors::jwt::JwtSecret, state::AppState};
use anyhow::Context;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

pub const JWT_ACCESS_TOKEN_EXPIRATION: Duration = Duration::days(1);
pub const TOKEN_COOKIE: &str = "jwt";

/// The authenticated actor of a request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub jti: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub session_key: Uuid,
    pub exp: u64,
}

impl Claims {
    pub fn new(user: &SessionUser, duration: Duration) -> Self {
        Self {
            jti: Uuid::new_v4(),
            user_id: user.id,
            username: user.username.clone(),
            session_key: user.session_key,
            exp: jsonwebtoken::get_current_timestamp() + duration.whole_seconds().unsigned_abs(),
        }
    }

    pub fn encode(&self, secret: &JwtSecret) -> Result<String, AuthError> {
        let token = encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.0.expose_secret().as_bytes()),
        )
        .context("Failed to encode the access JWT")?;
        Ok(token)
    }

    pub fn decode(token: &str, secret: &JwtSecret) -> Result<Self, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 5;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.0.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|_| AuthError::InvalidToken)?;

        Ok(data.claims)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        verify_access_token(parts, state).await
    }
}

/// Tokens can be fake, expired, logged out (blacklisted) or issued under an old
/// session key. Signature and expiry are checked by `jsonwebtoken`, the rest by postgres.
pub async fn verify_access_token(parts: &Parts, state: &AppState) -> Result<Claims, AuthError> {
    let token = token_from_parts(parts).ok_or(AuthError::InvalidToken)?;
    let claims = Claims::decode(&token, &state.jwt_secret)?;

    check_session(&state.postgres, &claims).await?;

    Ok(claims)
}

/// `jwt` cookie first, then `Authorization: Bearer`.
fn token_from_parts(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(|token| token.trim().to_string())
}

pub fn token_cookie<'a>(token: String) -> Cookie<'a> {
    Cookie::build(TOKEN_COOKIE, token)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(JWT_ACCESS_TOKEN_EXPIRATION)
        .finish()
}

pub fn remove_token_cookie<'a>() -> Cookie<'a> {
    Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .max_age(Duration::seconds(0))
        .finish()
}
