use crate::errors::{error_response, unexpected_response};
use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or email")]
    InvalidCredentials(#[from] validator::ValidationErrors),
    #[error("Invalid date, expected YYYY-MM-DD")]
    InvalidDate,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Missing credential")]
    MissingCredential,
    #[error("Password is too weak")]
    WeakPassword,
    #[error("Incorrect user or password")]
    WrongUserOrPassword,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials(_)
            | AuthError::InvalidDate
            | AuthError::MissingCredential
            | AuthError::WeakPassword => "validation_error",
            AuthError::UserAlreadyExists => "conflict",
            AuthError::WrongUserOrPassword | AuthError::InvalidToken => "unauthorized",
            AuthError::Unexpected(_) => "internal_error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AuthError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidDate => StatusCode::BAD_REQUEST,
            AuthError::UserAlreadyExists => StatusCode::CONFLICT,
            AuthError::MissingCredential => StatusCode::BAD_REQUEST,
            AuthError::WeakPassword => StatusCode::BAD_REQUEST,
            AuthError::WrongUserOrPassword => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Unexpected(e) => return unexpected_response(e),
        };

        error_response(status_code, self.code(), self.to_string())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unexpected(anyhow::Error::from(e))
    }
}
