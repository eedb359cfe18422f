//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("HTTP server startup failed: {0}")]
    ServerStartup(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type WebServerResult<T> = Result<T, WebServerError>;

impl WebServerError {
    /// HTTP status for this error, mirroring the original API's codes.
    fn status(&self) -> StatusCode {
        match self {
            WebServerError::Store(StoreError::EinNotFound { .. }) => StatusCode::NOT_FOUND,
            WebServerError::Store(StoreError::UnknownName { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            WebServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
