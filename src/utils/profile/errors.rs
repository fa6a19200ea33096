use crate::errors::{error_response, unexpected_response};
use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Invalid date, expected YYYY-MM-DD")]
    InvalidDate,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Email is already in use")]
    EmailTaken,
    #[error("The provided current password is incorrect")]
    IncorrectPassword,
    #[error("Missing password")]
    MissingPassword,
    #[error("Password is too weak")]
    WeakPassword,
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ProfileError {
    pub fn code(&self) -> &'static str {
        match self {
            ProfileError::InvalidDate
            | ProfileError::InvalidEmail
            | ProfileError::MissingPassword
            | ProfileError::WeakPassword => "validation_error",
            ProfileError::EmailTaken => "conflict",
            ProfileError::IncorrectPassword => "incorrect_password",
            ProfileError::UserNotFound => "not_found",
            ProfileError::Unexpected(_) => "internal_error",
        }
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            ProfileError::InvalidDate => StatusCode::BAD_REQUEST,
            ProfileError::InvalidEmail => StatusCode::BAD_REQUEST,
            ProfileError::EmailTaken => StatusCode::CONFLICT,
            // the caller is authenticated, only the confirmation is wrong
            ProfileError::IncorrectPassword => StatusCode::BAD_REQUEST,
            ProfileError::MissingPassword => StatusCode::BAD_REQUEST,
            ProfileError::WeakPassword => StatusCode::BAD_REQUEST,
            ProfileError::UserNotFound => StatusCode::NOT_FOUND,
            ProfileError::Unexpected(e) => return unexpected_response(e),
        };

        error_response(status_code, self.code(), self.to_string())
    }
}

impl From<sqlx::Error> for ProfileError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unexpected(anyhow::Error::from(e))
    }
}
