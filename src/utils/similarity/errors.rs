use crate::errors::unexpected_response;
use axum::response::IntoResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl IntoResponse for SimilarityError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            SimilarityError::Unexpected(e) => unexpected_response(e),
        }
    }
}

impl From<sqlx::Error> for SimilarityError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unexpected(anyhow::Error::from(e))
    }
}
