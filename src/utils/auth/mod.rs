pub mod additions;
pub mod errors;
pub mod models;
pub mod tokens;

use crate::{
    modules::{database::DbErrMessage, extractors::jwt::JwtSecret},
    utils::profile::parse_date,
};
use anyhow::Context;
use errors::*;
use models::{RegisterCredentials, SessionUser};
use secrecy::{ExposeSecret, SecretString};
use sqlx::{query, query_as, PgPool};
use time::OffsetDateTime;
use tokens::{Claims, JWT_ACCESS_TOKEN_EXPIRATION};
use tracing::{debug, trace};
use uuid::Uuid;
use validator::Validate;

pub async fn try_register_user(
    pool: &PgPool,
    credentials: RegisterCredentials,
) -> Result<Uuid, AuthError> {
    let username = credentials.username.trim();
    let email = credentials.email.trim().to_lowercase();
    let password = SecretString::new(credentials.password);

    if username.is_empty() || email.is_empty() || password.expose_secret().trim().is_empty() {
        return Err(AuthError::MissingCredential);
    }

    RegisterCredentials::new(username, &email, "").validate()?;

    let date_of_birth = match credentials.date_of_birth.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_date(raw).ok_or(AuthError::InvalidDate)?),
        _ => None,
    };

    if !additions::pass_is_strong(password.expose_secret(), &[username, &email]) {
        return Err(AuthError::WeakPassword);
    }

    let taken = query(
        r#"
            select id from users where username = $1 or email = $2
        "#,
    )
    .bind(username)
    .bind(&email)
    .fetch_optional(pool)
    .await
    .context("Failed to query user by username or email")?;

    if taken.is_some() {
        return Err(AuthError::UserAlreadyExists);
    }

    let hashed_pass = additions::hash_pass(&password)?;

    let name = credentials
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let (user_id,): (Uuid,) = query_as(
        r#"
            insert into users (username, email, password, name, date_of_birth)
            values ($1, $2, $3, $4, $5)
            returning id
        "#,
    )
    .bind(username)
    .bind(&email)
    .bind(hashed_pass)
    .bind(name)
    .bind(date_of_birth)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        DbErrMessage::new(e)
            .unique(AuthError::UserAlreadyExists)
            .into_err()
    })?;

    debug!("Registered user {user_id}");
    Ok(user_id)
}

pub async fn verify_user_credentials(
    pool: &PgPool,
    username: &str,
    password: SecretString,
) -> Result<SessionUser, AuthError> {
    debug!("Verifying credentials");
    if username.trim().is_empty() || password.expose_secret().trim().is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let res: Option<(Uuid, String, Uuid, String)> = query_as(
        r#"
            select id, username, session_key, password from users where username = $1
        "#,
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await
    .context("Failed to select user by username")?;

    let Some((id, username, session_key, hash)) = res else {
        return Err(AuthError::WrongUserOrPassword);
    };

    match additions::verify_pass(&hash, &password)? {
        true => Ok(SessionUser {
            id,
            username,
            session_key,
        }),
        false => Err(AuthError::WrongUserOrPassword),
    }
}

pub fn issue_token(user: &SessionUser, secret: &JwtSecret) -> Result<String, AuthError> {
    let token = Claims::new(user, JWT_ACCESS_TOKEN_EXPIRATION).encode(secret)?;
    trace!("Issued access JWT for {}", user.id);
    Ok(token)
}

/// Rejects tokens that were logged out or issued under a rotated session key.
pub async fn check_session(pool: &PgPool, claims: &Claims) -> Result<(), AuthError> {
    let res: Option<(Uuid, bool)> = query_as(
        r#"
            select u.session_key,
                   exists(select 1 from jwt_blacklist b where b.token_id = $2)
            from users u
            where u.id = $1
        "#,
    )
    .bind(claims.user_id)
    .bind(claims.jti)
    .fetch_optional(pool)
    .await
    .context("Failed to verify token session")?;

    match res {
        Some((session_key, false)) if session_key == claims.session_key => Ok(()),
        _ => Err(AuthError::InvalidToken),
    }
}

pub async fn add_token_to_blacklist(pool: &PgPool, claims: &Claims) -> Result<(), AuthError> {
    let exp = OffsetDateTime::from_unix_timestamp(claims.exp as i64)
        .context("Failed to convert timestamp to date and time with the timezone")?;

    query(
        r#"
            insert into jwt_blacklist (token_id, expiry)
            values ($1, $2)
            on conflict (token_id) do nothing
        "#,
    )
    .bind(claims.jti)
    .bind(exp)
    .execute(pool)
    .await
    .context("Failed to add token to the blacklist")?;

    trace!("Adding token to blacklist");
    Ok(())
}
