//! Course handlers: create, read, update, delete, list by semester.

use super::accepted;
use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::model::{CourseUpdate, NewCourse};
use crate::response::{no_content, success_created, success_many, success_one};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SemesterQuery {
    #[serde(default)]
    pub semester: String,
}

pub async fn create(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    body: Result<Json<NewCourse>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = accepted(&state, &token, body).await?;
    let course = state.service.create_course(&token, body).await?;
    Ok(success_created(course))
}

pub async fn read(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let course = state.service.get_course(&token, &course_id).await?;
    Ok(success_one(course))
}

pub async fn update(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(course_id): Path<String>,
    body: Result<Json<CourseUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = accepted(&state, &token, body).await?;
    let update = CourseUpdate { course_id, ..body };
    let course = state.service.update_course(&token, update).await?;
    Ok(success_one(course))
}

pub async fn delete(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.service.delete_course(&token, &course_id).await?;
    Ok(no_content())
}

pub async fn list_by_semester(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    query: Result<Query<SemesterQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = accepted(&state, &token, query).await?;
    let courses = state.service.list_courses_by_semester(&token, &query.semester).await?;
    Ok(success_many(courses))
}
