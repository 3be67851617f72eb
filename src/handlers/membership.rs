//! Student and staff membership handlers.

use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::model::Role;
use crate::response::{no_content, success_many};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

async fn add(state: &AppState, token: &str, role: Role, course_id: &str, member_id: &str) -> Result<StatusCode, AppError> {
    state.service.add_member(token, role, course_id, member_id).await?;
    Ok(no_content())
}

async fn remove(state: &AppState, token: &str, role: Role, course_id: &str, member_id: &str) -> Result<StatusCode, AppError> {
    state.service.remove_member(token, role, course_id, member_id).await?;
    Ok(no_content())
}

async fn members(state: &AppState, token: &str, role: Role, course_id: &str) -> Result<impl IntoResponse, AppError> {
    let ids = state.service.course_members(token, role, course_id).await?;
    Ok(success_many(ids))
}

async fn courses(state: &AppState, token: &str, role: Role, member_id: &str) -> Result<impl IntoResponse, AppError> {
    let ids = state.service.member_courses(token, role, member_id).await?;
    Ok(success_many(ids))
}

/// PUT /courses/:course_id/students/:student_id
pub async fn add_student(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path((course_id, student_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    add(&state, &token, Role::Student, &course_id, &student_id).await
}

/// DELETE /courses/:course_id/students/:student_id
pub async fn remove_student(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path((course_id, student_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    remove(&state, &token, Role::Student, &course_id, &student_id).await
}

/// GET /courses/:course_id/students
pub async fn course_students(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    members(&state, &token, Role::Student, &course_id).await
}

/// GET /students/:student_id/courses
pub async fn student_courses(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    courses(&state, &token, Role::Student, &student_id).await
}

/// PUT /courses/:course_id/staff/:staff_id
pub async fn add_staff(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path((course_id, staff_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    add(&state, &token, Role::Staff, &course_id, &staff_id).await
}

/// DELETE /courses/:course_id/staff/:staff_id
pub async fn remove_staff(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path((course_id, staff_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    remove(&state, &token, Role::Staff, &course_id, &staff_id).await
}

/// GET /courses/:course_id/staff
pub async fn course_staff(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    members(&state, &token, Role::Staff, &course_id).await
}

/// GET /staff/:staff_id/courses
pub async fn staff_courses(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(staff_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    courses(&state, &token, Role::Staff, &staff_id).await
}
