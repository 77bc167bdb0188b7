pub mod accounts;
pub mod admin;
pub mod reservations;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::engine::EngineError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(accounts::routes())
        .merge(reservations::routes())
        .merge(admin::routes())
}

/// The envelope every operation answers with: success flag, human-readable
/// message, optional typed payload. This is the stable dispatcher contract.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, payload: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
        })
    }
}

/// Payload-free envelope.
pub fn ack(success: bool, message: impl Into<String>) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success,
        message: message.into(),
        payload: None,
    })
}

/// Engine error mapped onto a status code plus the envelope.
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            EngineError::Unauthorized => StatusCode::UNAUTHORIZED,
            EngineError::UnknownUser(_) => StatusCode::NOT_FOUND,
            EngineError::SeatsUnavailable(_) => StatusCode::CONFLICT,
            EngineError::Credentials(_) | EngineError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, ack(false, self.0.to_string())).into_response()
    }
}
