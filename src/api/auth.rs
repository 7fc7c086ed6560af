use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, LoginRequest, RegisterRequest};
use crate::services::{RegisteredUser, UserInfo};

/// POST /auth/register
/// Create an account; 409 when the username is taken
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisteredUser>>), ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    if payload.role.is_empty() {
        return Err(ApiError::validation("Role is required"));
    }

    let user = state
        .auth_service()
        .register(&payload.username, &payload.password, &payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// POST /auth/login
/// Check username and password; no session or token is issued
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(user)))
}
