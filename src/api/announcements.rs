use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CreateAnnouncementRequest};
use crate::services::Announcement;

pub async fn list_announcements(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<Announcement>>> {
    Json(ApiResponse::success(state.announcements().list().await))
}

pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Announcement>>), ApiError> {
    let title = payload.title.unwrap_or_default();
    let content = payload.content.unwrap_or_default();

    let announcement = state.announcements().create(&title, &content).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(announcement))))
}
