//! Announcement handlers.

use super::accepted;
use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::model::{AnnouncementUpdate, NewAnnouncement};
use crate::response::{no_content, success_created, success_many, success_one};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

/// POST /courses/:course_id/announcements
pub async fn create(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(course_id): Path<String>,
    body: Result<Json<NewAnnouncement>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = accepted(&state, &token, body).await?;
    let announcement = state.service.add_announcement_to_course(&token, &course_id, body).await?;
    Ok(success_created(announcement))
}

/// GET /courses/:course_id/announcements
pub async fn list(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let announcements = state.service.get_course_announcements(&token, &course_id).await?;
    Ok(success_many(announcements))
}

/// PATCH /courses/:course_id/announcements/:announcement_id
pub async fn update(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path((course_id, announcement_id)): Path<(String, String)>,
    body: Result<Json<AnnouncementUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = accepted(&state, &token, body).await?;
    let announcement = state
        .service
        .update_announcement(&token, &course_id, &announcement_id, body)
        .await?;
    Ok(success_one(announcement))
}

/// DELETE /courses/:course_id/announcements/:announcement_id
pub async fn delete(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path((course_id, announcement_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state
        .service
        .remove_announcement_from_course(&token, &course_id, &announcement_id)
        .await?;
    Ok(no_content())
}
