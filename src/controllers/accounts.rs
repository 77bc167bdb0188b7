use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::{ack, ApiError};
use crate::middleware::AuthUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", post(create_account).delete(delete_account))
        .route("/accounts/login", post(login))
}

#[derive(Debug, Deserialize)]
struct CredentialsRequest {
    username: String,
    password: String,
}

// POST /api/accounts
async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .engine
        .create_account(&req.username, &req.password)
        .await?;
    let (status, message) = if created {
        (StatusCode::CREATED, "Account created")
    } else {
        (StatusCode::CONFLICT, "Account exists")
    };
    Ok((status, ack(created, message)))
}

// POST /api/accounts/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> impl IntoResponse {
    let ok = state.engine.login(&req.username, &req.password).await;
    let (status, message) = if ok {
        (StatusCode::OK, "Login successful")
    } else {
        (StatusCode::UNAUTHORIZED, "Invalid credentials")
    };
    (status, ack(ok, message))
}

// DELETE /api/accounts — the Basic-auth extractor already proved the caller
// owns the account being removed.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.engine.delete_account(&user.username).await?;
    let (status, message) = if deleted {
        (StatusCode::OK, "Account deleted")
    } else {
        (StatusCode::NOT_FOUND, "Account not found")
    };
    Ok((status, ack(deleted, message)))
}
