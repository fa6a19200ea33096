use crate::errors::AppError;
use crate::modules::extractors::jwt::JwtSecret;
use crate::state::AppState;
use crate::utils::auth::{
    issue_token,
    models::AuthResponse,
    tokens::{token_cookie, Claims},
};
use crate::utils::profile::{
    change_password, fetch_profile,
    models::{PasswordChange, Profile, ProfileUpdate},
    update_profile,
};
use axum::{
    debug_handler,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use secrecy::SecretString;
use sqlx::PgPool;
use tracing::{debug, instrument};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).post(post_profile))
        .route("/change_password", post(post_change_password))
}

#[debug_handler(state = AppState)]
async fn get_profile(State(pg): State<PgPool>, claims: Claims) -> Result<Json<Profile>, AppError> {
    Ok(Json(fetch_profile(&pg, claims.user_id).await?))
}

#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(user_id = %claims.user_id))]
async fn post_profile(
    State(pg): State<PgPool>,
    claims: Claims,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, AppError> {
    let profile = update_profile(&pg, claims.user_id, update).await?;
    debug!("Profile updated");
    Ok(Json(profile))
}

/// Every earlier token stops working, so the caller gets a fresh one.
#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(user_id = %claims.user_id))]
async fn post_change_password(
    State(pg): State<PgPool>,
    State(secret): State<JwtSecret>,
    claims: Claims,
    jar: CookieJar,
    Json(change): Json<PasswordChange>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user = change_password(
        &pg,
        claims.user_id,
        SecretString::new(change.current_password),
        SecretString::new(change.new_password),
    )
    .await?;
    let token = issue_token(&user, &secret)?;

    debug!("Password changed");
    Ok((
        jar.add(token_cookie(token.clone())),
        Json(AuthResponse {
            token,
            user_id: user.id,
        }),
    ))
}
