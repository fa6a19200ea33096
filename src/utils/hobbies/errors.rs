use crate::errors::{error_response, unexpected_response};
use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HobbyError {
    #[error("Hobby name is required")]
    MissingName,
    #[error("Hobby id is required")]
    MissingHobbyId,
    #[error("Hobby already exists")]
    AlreadyExists,
    #[error("Hobby not found")]
    HobbyNotFound,
    #[error("No matching hobby found")]
    NotAttached,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl HobbyError {
    pub fn code(&self) -> &'static str {
        match self {
            HobbyError::MissingName | HobbyError::MissingHobbyId => "validation_error",
            HobbyError::AlreadyExists => "conflict",
            HobbyError::HobbyNotFound | HobbyError::NotAttached => "not_found",
            HobbyError::Unexpected(_) => "internal_error",
        }
    }
}

impl IntoResponse for HobbyError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            HobbyError::MissingName => StatusCode::BAD_REQUEST,
            HobbyError::MissingHobbyId => StatusCode::BAD_REQUEST,
            HobbyError::AlreadyExists => StatusCode::CONFLICT,
            HobbyError::HobbyNotFound => StatusCode::NOT_FOUND,
            HobbyError::NotAttached => StatusCode::NOT_FOUND,
            HobbyError::Unexpected(e) => return unexpected_response(e),
        };

        error_response(status_code, self.code(), self.to_string())
    }
}

impl From<sqlx::Error> for HobbyError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unexpected(anyhow::Error::from(e))
    }
}
