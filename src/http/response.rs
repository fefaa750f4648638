//! Error responses for the admin API.
//!
//! # Status Mapping
//! - malformed path, invalid payload → 400
//! - path / route not found → 404
//! - type mismatch, duplicate route → 409
//! - storage unavailable (load or save) → 503
//! - anything else → 500

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;

use crate::error::StoreError;

/// Success body for mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMsg {
    #[serde(rename = "Response")]
    pub response: String,
}

impl ResponseMsg {
    pub fn new(response: impl Into<String>) -> Json<Self> {
        Json(Self {
            response: response.into(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    BadRequest(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        ApiError::Internal(format!("store task failed: {e}"))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(e) => match e {
                StoreError::MalformedPath(_) => StatusCode::BAD_REQUEST,
                StoreError::PathNotFound(_) | StoreError::RouteNotFound(_) => StatusCode::NOT_FOUND,
                StoreError::TypeMismatch { .. } | StoreError::DuplicateRoute(_) => {
                    StatusCode::CONFLICT
                }
                StoreError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, message) = match self {
            ApiError::Store(StoreError::PersistenceUnavailable(e)) if e.is_save() => (
                "not_persisted",
                format!("change was not saved and has been discarded: {e}"),
            ),
            ApiError::Store(e) => (e.kind(), e.to_string()),
            ApiError::BadRequest(msg) => ("bad_request", msg.clone()),
            ApiError::Internal(msg) => ("internal", msg.clone()),
        };
        ErrorBody {
            error: error.to_string(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %body.error, message = %body.message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %body.error, message = %body.message, "Request rejected");
        }
        (status, Json(body)).into_response()
    }
}
