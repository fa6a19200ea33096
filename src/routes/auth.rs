use crate::errors::AppError;
use crate::modules::extractors::jwt::JwtSecret;
use crate::state::AppState;
use crate::utils::auth::models::*;
use crate::utils::auth::tokens::{remove_token_cookie, token_cookie, Claims};
use crate::utils::auth::*;
use axum::extract::State;
use axum::{debug_handler, routing::post, Json, Router};
use axum_extra::extract::CookieJar;
use secrecy::SecretString;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{debug, instrument};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(post_register_user))
        .route("/login", post(post_login_user))
        .route("/validate", post(protected_zone))
        .route("/logout", post(post_user_logout))
}

#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(username = %credentials.username))]
async fn post_register_user(
    State(pg): State<PgPool>,
    State(secret): State<JwtSecret>,
    jar: CookieJar,
    Json(credentials): Json<RegisterCredentials>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let username = credentials.username.clone();
    let password = SecretString::new(credentials.password.clone());

    let user_id = try_register_user(&pg, credentials).await?;
    let user = verify_user_credentials(&pg, &username, password).await?;
    let token = issue_token(&user, &secret)?;

    debug!("User {user_id} registered successfully");
    Ok((
        jar.add(token_cookie(token.clone())),
        Json(AuthResponse { token, user_id }),
    ))
}

#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(username = %credentials.username))]
async fn post_login_user(
    State(pg): State<PgPool>,
    State(secret): State<JwtSecret>,
    jar: CookieJar,
    Json(credentials): Json<LoginCredentials>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    // returns if credentials are wrong
    let user = verify_user_credentials(
        &pg,
        &credentials.username,
        SecretString::new(credentials.password),
    )
    .await?;
    let token = issue_token(&user, &secret)?;

    debug!("User {} logged in successfully", user.id);
    Ok((
        jar.add(token_cookie(token.clone())),
        Json(AuthResponse {
            token,
            user_id: user.id,
        }),
    ))
}

async fn protected_zone(claims: Claims) -> Json<Value> {
    Json(json!({ "user_id": claims.user_id, "username": claims.username }))
}

#[debug_handler(state = AppState)]
async fn post_user_logout(
    State(pg): State<PgPool>,
    claims: Claims,
    jar: CookieJar,
) -> Result<CookieJar, AppError> {
    add_token_to_blacklist(&pg, &claims).await?;

    debug!("User {} logged out successfully", claims.user_id);
    Ok(jar.remove(remove_token_cookie()))
}
