use axum::{
    debug_handler,
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{configuration::Settings, state::AppState};

pub mod auth;
pub mod friends;
pub mod hobbies;
pub mod profile;
pub mod users;

pub async fn app(config: Settings, test_pool: Option<PgPool>) -> anyhow::Result<Router> {
    let origin = config.app.origin.parse::<HeaderValue>()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    let state = AppState::new(config, test_pool).await?;

    let router = Router::new()
        .nest("/auth", auth::router())
        .merge(profile::router())
        .merge(hobbies::router())
        .merge(friends::router())
        .merge(users::router())
        .route("/health", get(health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

#[debug_handler]
async fn health_check(State(pool): State<PgPool>) -> impl IntoResponse {
    let is_database_connected = sqlx::query("select 1").fetch_one(&pool).await.is_ok();
    if is_database_connected {
        return (
            StatusCode::OK,
            Json(json!({"status": "all backend services are working properly"})),
        );
    }
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({"status": "database unavailable"})),
    )
}
