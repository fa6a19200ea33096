use crate::errors::{error_response, unexpected_response};
use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FriendError {
    #[error("Cannot send a friend request to yourself")]
    SelfRequest,
    #[error("User not found")]
    UserNotFound,
    #[error("Already a friend")]
    AlreadyFriends,
    #[error("Friend request already sent")]
    DuplicateRequest,
    #[error("Friend request is missing")]
    RequestNotFound,
    #[error("Invalid action '{0}', expected 'accept' or 'decline'")]
    InvalidAction(String),
    #[error("Not a friend")]
    NotFriends,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl FriendError {
    pub fn code(&self) -> &'static str {
        match self {
            FriendError::SelfRequest => "validation_error",
            FriendError::UserNotFound | FriendError::RequestNotFound | FriendError::NotFriends => {
                "not_found"
            }
            FriendError::AlreadyFriends => "already_friends",
            FriendError::DuplicateRequest => "duplicate_request",
            FriendError::InvalidAction(_) => "invalid_action",
            FriendError::Unexpected(_) => "internal_error",
        }
    }
}

impl IntoResponse for FriendError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            FriendError::SelfRequest => StatusCode::BAD_REQUEST,
            FriendError::UserNotFound => StatusCode::NOT_FOUND,
            FriendError::AlreadyFriends => StatusCode::BAD_REQUEST,
            FriendError::DuplicateRequest => StatusCode::BAD_REQUEST,
            FriendError::RequestNotFound => StatusCode::NOT_FOUND,
            FriendError::InvalidAction(_) => StatusCode::BAD_REQUEST,
            FriendError::NotFriends => StatusCode::NOT_FOUND,
            FriendError::Unexpected(e) => return unexpected_response(e),
        };

        error_response(status_code, self.code(), self.to_string())
    }
}

impl From<sqlx::Error> for FriendError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unexpected(anyhow::Error::from(e))
    }
}
