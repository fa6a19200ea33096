use crate::errors::AppError;
use crate::state::AppState;
use crate::utils::auth::tokens::Claims;
use crate::utils::similarity::{
    models::{FoundUser, SimilarUsersPage, SimilarityFilter, UserSearch},
    search_users, similar_users,
};
use axum::{
    debug_handler,
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(find_users))
        .route("/users/similar", get(similar))
}

#[debug_handler(state = AppState)]
async fn find_users(
    State(pg): State<PgPool>,
    claims: Claims,
    Query(query): Query<UserSearch>,
) -> Result<Json<Vec<FoundUser>>, AppError> {
    let search = query.search.unwrap_or_default();
    Ok(Json(search_users(&pg, claims.user_id, &search).await?))
}

#[debug_handler(state = AppState)]
async fn similar(
    State(pg): State<PgPool>,
    claims: Claims,
    Query(filter): Query<SimilarityFilter>,
) -> Result<Json<SimilarUsersPage>, AppError> {
    Ok(Json(similar_users(&pg, claims.user_id, filter).await?))
}
