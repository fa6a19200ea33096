use crate::errors::AppError;
use crate::state::AppState;
use crate::utils::auth::tokens::Claims;
use crate::utils::hobbies::{
    attach_hobby, create_hobby, detach_hobby,
    errors::HobbyError,
    fetch_all_hobbies, fetch_user_hobbies,
    models::{Hobby, HobbyAttachment, NewHobby},
};
use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hobbies", get(all_hobbies).post(post_hobby))
        .route("/user_hobbies", get(user_hobbies).post(post_user_hobby))
        .route("/user_hobbies/:id", delete(delete_user_hobby))
}

#[debug_handler(state = AppState)]
async fn all_hobbies(State(pg): State<PgPool>, _: Claims) -> Result<Json<Vec<Hobby>>, AppError> {
    Ok(Json(fetch_all_hobbies(&pg).await?))
}

#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(user_id = %claims.user_id))]
async fn post_hobby(
    State(pg): State<PgPool>,
    claims: Claims,
    Json(hobby): Json<NewHobby>,
) -> Result<(StatusCode, Json<Hobby>), AppError> {
    let name = hobby.name.ok_or(HobbyError::MissingName)?;
    let hobby = create_hobby(&pg, &name).await?;
    Ok((StatusCode::CREATED, Json(hobby)))
}

#[debug_handler(state = AppState)]
async fn user_hobbies(
    State(pg): State<PgPool>,
    claims: Claims,
) -> Result<Json<Vec<Hobby>>, AppError> {
    Ok(Json(fetch_user_hobbies(&pg, claims.user_id).await?))
}

/// Responds with the user's hobbies after the change.
#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(user_id = %claims.user_id))]
async fn post_user_hobby(
    State(pg): State<PgPool>,
    claims: Claims,
    Json(attachment): Json<HobbyAttachment>,
) -> Result<Json<Vec<Hobby>>, AppError> {
    let hobby_id = attachment.hobby_id.ok_or(HobbyError::MissingHobbyId)?;
    attach_hobby(&pg, claims.user_id, hobby_id).await?;

    debug!("Attached hobby {hobby_id}");
    Ok(Json(fetch_user_hobbies(&pg, claims.user_id).await?))
}

#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(user_id = %claims.user_id))]
async fn delete_user_hobby(
    State(pg): State<PgPool>,
    claims: Claims,
    Path(hobby_id): Path<Uuid>,
) -> Result<Json<Vec<Hobby>>, AppError> {
    detach_hobby(&pg, claims.user_id, hobby_id).await?;

    debug!("Detached hobby {hobby_id}");
    Ok(Json(fetch_user_hobbies(&pg, claims.user_id).await?))
}
