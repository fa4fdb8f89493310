//! Error types for the service and their HTTP mapping.

use crate::response::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::net::SocketAddr;
use terrapatch_patch::PatchError;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that stop the service or a CLI command.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listening socket.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying error.
        source: std::io::Error,
    },

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Extraction failed in a CLI command.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Opening the raster failed in a CLI command.
    #[error(transparent)]
    Dem(#[from] terrapatch_dem::DemError),

    /// Encoding output failed.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A failed request: status plus a JSON [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PatchError> for ApiError {
    fn from(err: PatchError) -> Self {
        let status = match &err {
            PatchError::InvalidSize { .. } | PatchError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
            PatchError::EmptyWindow { .. } => StatusCode::NOT_FOUND,
            PatchError::AllMissing { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PatchError::Source(_) if err.is_source_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            PatchError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, error = %self.message, "request failed");
        } else {
            debug!(status = %self.status, error = %self.message, "request rejected");
        }
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}
