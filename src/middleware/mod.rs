use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

use crate::controllers::ApiError;
use crate::engine::EngineError;
use crate::AppState;

/// Basic-auth extractor: decodes the header and checks the credentials
/// against the user directory. Handlers get the verified username.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError(EngineError::Unauthorized))?;

        let encoded = auth_header
            .strip_prefix("Basic ")
            .ok_or(ApiError(EngineError::Unauthorized))?;

        let decoded = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| ApiError(EngineError::Unauthorized))?;
        let credentials =
            String::from_utf8(decoded).map_err(|_| ApiError(EngineError::Unauthorized))?;

        let mut split = credentials.splitn(2, ':');
        let username = split.next().ok_or(ApiError(EngineError::Unauthorized))?;
        let password = split.next().ok_or(ApiError(EngineError::Unauthorized))?;

        if !state.engine.login(username, password).await {
            return Err(ApiError(EngineError::Unauthorized));
        }

        Ok(AuthUser {
            username: username.to_string(),
        })
    }
}

/// Gate for admin routes: the `X-Admin-Key` header must pass the engine's
/// injected admin policy.
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

impl FromRequestParts<Arc<AppState>> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get("x-admin-key")
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError(EngineError::Unauthorized))?;

        if !state.engine.validate_admin(key) {
            return Err(ApiError(EngineError::Unauthorized));
        }
        Ok(AdminKey)
    }
}
