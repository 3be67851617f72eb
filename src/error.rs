//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Kind of record a store error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Course,
    Student,
    Staff,
    Announcement,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Course => "course",
            Entity::Student => "student",
            Entity::Staff => "staff",
            Entity::Announcement => "announcement",
        })
    }
}

impl From<crate::model::Role> for Entity {
    fn from(role: crate::model::Role) -> Self {
        match role {
            crate::model::Role::Student => Entity::Student,
            crate::model::Role::Staff => Entity::Staff,
        }
    }
}

/// Errors returned by every `CourseStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{field} is empty")]
    EmptyField { field: &'static str },
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: Entity, id: String },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl StoreError {
    pub fn empty(field: &'static str) -> Self {
        StoreError::EmptyField { field }
    }

    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        StoreError::NotFound { entity, id: id.into() }
    }

    pub fn already_exists(entity: Entity, id: impl Into<String>) -> Self {
        StoreError::AlreadyExists { entity, id: id.into() }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Machine-readable outcome kind surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::Internal => "internal",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Caller-facing error produced by the service layer. Raw storage errors never
/// cross this boundary. The kind travels separately as [`ErrorKind::code`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            AppError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmptyField { .. } => AppError::InvalidArgument(e.to_string()),
            StoreError::NotFound { .. } => AppError::NotFound(e.to_string()),
            StoreError::AlreadyExists { .. } => AppError::AlreadyExists(e.to_string()),
            StoreError::Db(err) => {
                tracing::error!(error = %err, "store failure");
                AppError::Internal("storage failure".into())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthenticated(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidArgument(rejection.body_text())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let body = ErrorBody {
            error: ErrorDetail {
                code: kind.code().to_string(),
                message: self.to_string(),
            },
        };
        (kind.status(), Json(body)).into_response()
    }
}
