//! Course service: authorizes each call, then delegates to the configured store.

use crate::auth::{Claims, TokenVerifier};
use crate::error::AppError;
use crate::model::{Announcement, AnnouncementUpdate, Course, CourseUpdate, NewAnnouncement, NewCourse, Role};
use crate::store::CourseStore;
use std::sync::Arc;
use tracing::instrument;

/// Thin orchestration layer over a [`CourseStore`]. Holds no entity state
/// between calls; concurrent updates to one course are last-writer-wins.
#[derive(Clone)]
pub struct CourseService {
    store: Arc<dyn CourseStore>,
    verifier: Arc<dyn TokenVerifier>,
}

impl CourseService {
    pub fn new(store: Arc<dyn CourseStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }

    pub fn store(&self) -> &Arc<dyn CourseStore> {
        &self.store
    }

    /// Verify `token` without touching the store.
    pub async fn authorize(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.verifier.verify(token).await?;
        tracing::debug!(subject = %claims.subject, "caller authorized");
        Ok(claims)
    }

    #[instrument(skip(self, token))]
    pub async fn get_course(&self, token: &str, course_id: &str) -> Result<Course, AppError> {
        self.authorize(token).await?;
        Ok(self.store.get_course(course_id).await?)
    }

    #[instrument(skip(self, token, course), fields(course_id = %course.course_id))]
    pub async fn create_course(&self, token: &str, course: NewCourse) -> Result<Course, AppError> {
        self.authorize(token).await?;
        let created = self.store.add_course(course).await?;
        tracing::info!(course_id = %created.course_id, semester = %created.semester, "course created");
        Ok(created)
    }

    /// Empty incoming fields leave the stored values untouched.
    #[instrument(skip(self, token, update), fields(course_id = %update.course_id))]
    pub async fn update_course(&self, token: &str, update: CourseUpdate) -> Result<Course, AppError> {
        self.authorize(token).await?;
        Ok(self.store.update_course(update.normalized()).await?)
    }

    #[instrument(skip(self, token))]
    pub async fn delete_course(&self, token: &str, course_id: &str) -> Result<(), AppError> {
        self.authorize(token).await?;
        self.store.delete_course(course_id).await?;
        tracing::info!(course_id, "course deleted");
        Ok(())
    }

    #[instrument(skip(self, token))]
    pub async fn list_courses_by_semester(&self, token: &str, semester: &str) -> Result<Vec<Course>, AppError> {
        self.authorize(token).await?;
        Ok(self.store.get_courses_by_semester(semester).await?)
    }

    #[instrument(skip(self, token))]
    pub async fn add_member(&self, token: &str, role: Role, course_id: &str, member_id: &str) -> Result<(), AppError> {
        self.authorize(token).await?;
        Ok(self.store.add_member(role, course_id, member_id).await?)
    }

    #[instrument(skip(self, token))]
    pub async fn remove_member(&self, token: &str, role: Role, course_id: &str, member_id: &str) -> Result<(), AppError> {
        self.authorize(token).await?;
        Ok(self.store.remove_member(role, course_id, member_id).await?)
    }

    #[instrument(skip(self, token))]
    pub async fn course_members(&self, token: &str, role: Role, course_id: &str) -> Result<Vec<String>, AppError> {
        self.authorize(token).await?;
        Ok(self.store.course_members(role, course_id).await?)
    }

    #[instrument(skip(self, token))]
    pub async fn member_courses(&self, token: &str, role: Role, member_id: &str) -> Result<Vec<String>, AppError> {
        self.authorize(token).await?;
        Ok(self.store.member_courses(role, member_id).await?)
    }

    pub async fn add_student_to_course(&self, token: &str, course_id: &str, student_id: &str) -> Result<(), AppError> {
        self.add_member(token, Role::Student, course_id, student_id).await
    }

    pub async fn remove_student_from_course(&self, token: &str, course_id: &str, student_id: &str) -> Result<(), AppError> {
        self.remove_member(token, Role::Student, course_id, student_id).await
    }

    pub async fn get_course_students(&self, token: &str, course_id: &str) -> Result<Vec<String>, AppError> {
        self.course_members(token, Role::Student, course_id).await
    }

    pub async fn get_student_courses(&self, token: &str, student_id: &str) -> Result<Vec<String>, AppError> {
        self.member_courses(token, Role::Student, student_id).await
    }

    pub async fn add_staff_to_course(&self, token: &str, course_id: &str, staff_id: &str) -> Result<(), AppError> {
        self.add_member(token, Role::Staff, course_id, staff_id).await
    }

    pub async fn remove_staff_from_course(&self, token: &str, course_id: &str, staff_id: &str) -> Result<(), AppError> {
        self.remove_member(token, Role::Staff, course_id, staff_id).await
    }

    pub async fn get_course_staff(&self, token: &str, course_id: &str) -> Result<Vec<String>, AppError> {
        self.course_members(token, Role::Staff, course_id).await
    }

    pub async fn get_staff_courses(&self, token: &str, staff_id: &str) -> Result<Vec<String>, AppError> {
        self.member_courses(token, Role::Staff, staff_id).await
    }

    #[instrument(skip(self, token, announcement), fields(announcement_id = %announcement.announcement_id))]
    pub async fn add_announcement_to_course(
        &self,
        token: &str,
        course_id: &str,
        announcement: NewAnnouncement,
    ) -> Result<Announcement, AppError> {
        self.authorize(token).await?;
        Ok(self.store.add_announcement(course_id, announcement).await?)
    }

    #[instrument(skip(self, token))]
    pub async fn get_course_announcements(&self, token: &str, course_id: &str) -> Result<Vec<Announcement>, AppError> {
        self.authorize(token).await?;
        Ok(self.store.get_announcements(course_id).await?)
    }

    #[instrument(skip(self, token, update))]
    pub async fn update_announcement(
        &self,
        token: &str,
        course_id: &str,
        announcement_id: &str,
        update: AnnouncementUpdate,
    ) -> Result<Announcement, AppError> {
        self.authorize(token).await?;
        Ok(self
            .store
            .update_announcement(course_id, announcement_id, update.normalized())
            .await?)
    }

    #[instrument(skip(self, token))]
    pub async fn remove_announcement_from_course(
        &self,
        token: &str,
        course_id: &str,
        announcement_id: &str,
    ) -> Result<(), AppError> {
        self.authorize(token).await?;
        Ok(self.store.remove_announcement(course_id, announcement_id).await?)
    }
}
