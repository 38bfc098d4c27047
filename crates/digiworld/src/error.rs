//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use store::StoreError;
use thiserror::Error;
use tracing::{error, warn};

use crate::envelope::ApiResponse;

/// Errors surfaced by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid digimon id: {0}")]
    InvalidId(String),

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_) | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(err) => match err {
                StoreError::ValidationFailed(_) | StoreError::InvalidArgument(_) => {
                    StatusCode::BAD_REQUEST
                }
                StoreError::DuplicateName(_) => StatusCode::CONFLICT,
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> ApiResponse<()> {
        match self {
            ApiError::InvalidId(_) => ApiResponse::failure("Invalid digimon id"),
            ApiError::InvalidJson(_) => ApiResponse::failure("Invalid JSON body"),
            ApiError::Store(StoreError::ValidationFailed(errors)) => {
                ApiResponse::invalid("Invalid digimon data", errors.clone())
            }
            ApiError::Store(StoreError::InvalidArgument(message)) => {
                ApiResponse::failure(format!("Invalid digimon data: {}", message))
            }
            ApiError::Store(StoreError::DuplicateName(_)) => {
                ApiResponse::failure("A digimon with that name already exists")
            }
            ApiError::Store(StoreError::NotFound(_)) => ApiResponse::failure("Digimon not found"),
            ApiError::Store(StoreError::StorageUnavailable(_)) => {
                ApiResponse::failure("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}
