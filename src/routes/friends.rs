use crate::errors::AppError;
use crate::state::AppState;
use crate::utils::auth::tokens::Claims;
use crate::utils::friends::models::{
    Friend, FriendRequest, FriendRequestAction, FriendRequestOutcome, FriendRequestResponse,
    IncomingFriendRequest, NewFriendRequest,
};
use crate::utils::friends::{
    fetch_incoming_requests, fetch_user_friends, remove_user_friend, respond_to_friend_request,
    send_friend_request,
};
use axum::{
    debug_handler,
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/friend_requests",
            get(incoming_requests).post(post_friend_request),
        )
        .route("/friend_requests/:id", post(respond_to_request))
        .route("/friends", get(user_friends))
        .route("/friends/:id", delete(delete_friend))
}

#[debug_handler(state = AppState)]
async fn incoming_requests(
    State(pg): State<PgPool>,
    claims: Claims,
) -> Result<Json<Vec<IncomingFriendRequest>>, AppError> {
    Ok(Json(fetch_incoming_requests(&pg, claims.user_id).await?))
}

#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(user_id = %claims.user_id))]
async fn post_friend_request(
    State(pg): State<PgPool>,
    claims: Claims,
    Json(request): Json<NewFriendRequest>,
) -> Result<Json<FriendRequest>, AppError> {
    let request = send_friend_request(&pg, claims.user_id, request.receiver_id).await?;
    Ok(Json(request))
}

#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(user_id = %claims.user_id))]
async fn respond_to_request(
    State(pg): State<PgPool>,
    claims: Claims,
    Path(request_id): Path<Uuid>,
    Json(response): Json<FriendRequestResponse>,
) -> Result<Json<FriendRequestOutcome>, AppError> {
    let action = FriendRequestAction::try_from(response.action)?;
    let status = respond_to_friend_request(&pg, request_id, claims.user_id, action).await?;
    Ok(Json(FriendRequestOutcome {
        id: request_id,
        status,
    }))
}

#[debug_handler(state = AppState)]
async fn user_friends(
    State(pg): State<PgPool>,
    claims: Claims,
) -> Result<Json<Vec<Friend>>, AppError> {
    Ok(Json(fetch_user_friends(&pg, claims.user_id).await?))
}

#[debug_handler(state = AppState)]
#[instrument(skip_all, fields(user_id = %claims.user_id))]
async fn delete_friend(
    State(pg): State<PgPool>,
    claims: Claims,
    Path(friend_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    remove_user_friend(&pg, claims.user_id, friend_id).await?;
    Ok(Json(json!({ "removed": friend_id })))
}
