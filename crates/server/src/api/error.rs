use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use spotlist_core::SpotError;
use thiserror::Error;

/// Errors surfaced by the catalog handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No spot with id {0}")]
    SpotNotFound(String),

    #[error("Storage unavailable: {0}")]
    Storage(String),
}

impl From<SpotError> for ApiError {
    fn from(e: SpotError) -> Self {
        match e {
            SpotError::NotFound(id) => ApiError::SpotNotFound(id.to_string()),
            SpotError::Storage(msg) => ApiError::Storage(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::SpotNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
