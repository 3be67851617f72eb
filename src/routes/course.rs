//! Course, membership and announcement routes.

use crate::handlers::{announcement, course, membership};
use crate::state::AppState;
use axum::{routing::get, routing::put, Router};

pub fn course_routes(state: AppState) -> Router {
    Router::new()
        .route("/courses", get(course::list_by_semester).post(course::create))
        .route(
            "/courses/:course_id",
            get(course::read).patch(course::update).delete(course::delete),
        )
        .route("/courses/:course_id/students", get(membership::course_students))
        .route(
            "/courses/:course_id/students/:student_id",
            put(membership::add_student).delete(membership::remove_student),
        )
        .route("/courses/:course_id/staff", get(membership::course_staff))
        .route(
            "/courses/:course_id/staff/:staff_id",
            put(membership::add_staff).delete(membership::remove_staff),
        )
        .route("/students/:student_id/courses", get(membership::student_courses))
        .route("/staff/:staff_id/courses", get(membership::staff_courses))
        .route(
            "/courses/:course_id/announcements",
            get(announcement::list).post(announcement::create),
        )
        .route(
            "/courses/:course_id/announcements/:announcement_id",
            axum::routing::patch(announcement::update).delete(announcement::delete),
        )
        .with_state(state)
}
