//! Store contract shared by the PostgreSQL and in-memory backends.
//!
//! Rules every implementation follows:
//! - empty identifiers fail with [`StoreError::EmptyField`] before storage is touched;
//! - adding an existing course membership is a no-op;
//! - removing or updating something absent fails with [`StoreError::NotFound`];
//! - deleting a course removes its memberships and announcements in the same
//!   transaction (or critical section);
//! - listing the members or announcements of an absent course is `NotFound`,
//!   while an existing course with none yields an empty list.

pub mod memory;
pub mod postgres;

pub use memory::MemoryCourseStore;
pub use postgres::{ensure_database_exists, PgCourseStore};

use crate::error::StoreError;
use crate::model::{Announcement, AnnouncementUpdate, Course, CourseUpdate, NewAnnouncement, NewCourse, Role};
use async_trait::async_trait;

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn add_course(&self, course: NewCourse) -> Result<Course, StoreError>;
    async fn get_course(&self, course_id: &str) -> Result<Course, StoreError>;
    async fn update_course(&self, update: CourseUpdate) -> Result<Course, StoreError>;
    async fn delete_course(&self, course_id: &str) -> Result<(), StoreError>;
    async fn get_courses_by_semester(&self, semester: &str) -> Result<Vec<Course>, StoreError>;

    async fn add_member(&self, role: Role, course_id: &str, member_id: &str) -> Result<(), StoreError>;
    async fn remove_member(&self, role: Role, course_id: &str, member_id: &str) -> Result<(), StoreError>;
    async fn course_members(&self, role: Role, course_id: &str) -> Result<Vec<String>, StoreError>;
    async fn member_courses(&self, role: Role, member_id: &str) -> Result<Vec<String>, StoreError>;

    async fn add_announcement(&self, course_id: &str, announcement: NewAnnouncement) -> Result<Announcement, StoreError>;
    async fn get_announcements(&self, course_id: &str) -> Result<Vec<Announcement>, StoreError>;
    async fn update_announcement(
        &self,
        course_id: &str,
        announcement_id: &str,
        update: AnnouncementUpdate,
    ) -> Result<Announcement, StoreError>;
    async fn remove_announcement(&self, course_id: &str, announcement_id: &str) -> Result<(), StoreError>;

    /// Backend health check used by readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn add_student_to_course(&self, course_id: &str, student_id: &str) -> Result<(), StoreError> {
        self.add_member(Role::Student, course_id, student_id).await
    }

    async fn remove_student_from_course(&self, course_id: &str, student_id: &str) -> Result<(), StoreError> {
        self.remove_member(Role::Student, course_id, student_id).await
    }

    async fn get_course_students(&self, course_id: &str) -> Result<Vec<String>, StoreError> {
        self.course_members(Role::Student, course_id).await
    }

    async fn get_student_courses(&self, student_id: &str) -> Result<Vec<String>, StoreError> {
        self.member_courses(Role::Student, student_id).await
    }

    async fn add_staff_to_course(&self, course_id: &str, staff_id: &str) -> Result<(), StoreError> {
        self.add_member(Role::Staff, course_id, staff_id).await
    }

    async fn remove_staff_from_course(&self, course_id: &str, staff_id: &str) -> Result<(), StoreError> {
        self.remove_member(Role::Staff, course_id, staff_id).await
    }

    async fn get_course_staff(&self, course_id: &str) -> Result<Vec<String>, StoreError> {
        self.course_members(Role::Staff, course_id).await
    }

    async fn get_staff_courses(&self, staff_id: &str) -> Result<Vec<String>, StoreError> {
        self.member_courses(Role::Staff, staff_id).await
    }
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), StoreError> {
    if value.is_empty() {
        return Err(StoreError::empty(field));
    }
    Ok(())
}

pub(crate) fn validate_new_course(course: &NewCourse) -> Result<(), StoreError> {
    require(&course.course_id, "course id")?;
    require(&course.course_name, "course name")?;
    require(&course.semester, "semester")
}

pub(crate) fn validate_membership(role: Role, course_id: &str, member_id: &str) -> Result<(), StoreError> {
    require(course_id, "course id")?;
    require(member_id, role.id_field())
}

pub(crate) fn validate_new_announcement(course_id: &str, announcement: &NewAnnouncement) -> Result<(), StoreError> {
    require(course_id, "course id")?;
    if announcement.is_empty() {
        return Err(StoreError::empty("announcement"));
    }
    Ok(())
}
