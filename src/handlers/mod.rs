//! HTTP handlers for courses, memberships and announcements.

pub mod announcement;
pub mod course;
pub mod membership;

use crate::error::AppError;
use crate::state::AppState;

/// Unwrap an extracted request input. A rejected input is only reported once the
/// token is accepted, so unauthenticated callers never see payload errors.
pub(crate) async fn accepted<T, R>(state: &AppState, token: &str, extracted: Result<T, R>) -> Result<T, AppError>
where
    R: Into<AppError>,
{
    match extracted {
        Ok(value) => Ok(value),
        Err(rejection) => {
            state.service.authorize(token).await?;
            Err(rejection.into())
        }
    }
}
