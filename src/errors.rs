use crate::utils::{
    auth::errors::AuthError, friends::errors::FriendError, hobbies::errors::HobbyError,
    profile::errors::ProfileError, similarity::errors::SimilarityError,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    AuthError(#[from] AuthError),
    #[error(transparent)]
    ProfileError(#[from] ProfileError),
    #[error(transparent)]
    HobbyError(#[from] HobbyError),
    #[error(transparent)]
    FriendError(#[from] FriendError),
    #[error(transparent)]
    SimilarityError(#[from] SimilarityError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::AuthError(e) => e.into_response(),
            AppError::ProfileError(e) => e.into_response(),
            AppError::HobbyError(e) => e.into_response(),
            AppError::FriendError(e) => e.into_response(),
            AppError::SimilarityError(e) => e.into_response(),
        }
    }
}

/// Body shared by every component error: a stable machine code plus a message.
pub fn error_response(status_code: StatusCode, error: &str, info: String) -> Response {
    (
        status_code,
        Json(json!({ "error": error, "error_info": info })),
    )
        .into_response()
}

pub fn unexpected_response(e: &anyhow::Error) -> Response {
    tracing::error!("Internal server error: {e:?}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Unexpected server error".into(),
    )
}
