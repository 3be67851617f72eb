//! In-memory course store for tests and database-free runs.
//!
//! All maps live behind one reader/writer lock, so every operation, including
//! the cascading delete, observes and mutates a consistent snapshot.

use super::{require, validate_membership, validate_new_announcement, validate_new_course, CourseStore};
use crate::error::{Entity, StoreError};
use crate::model::{Announcement, AnnouncementUpdate, Course, CourseUpdate, NewAnnouncement, NewCourse, Role};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

/// Two-way adjacency between courses and the members of one role.
#[derive(Default)]
struct Memberships {
    by_course: HashMap<String, BTreeSet<String>>,
    by_member: HashMap<String, BTreeSet<String>>,
}

impl Memberships {
    /// Returns false when the pair was already present.
    fn insert(&mut self, course_id: &str, member_id: &str) -> bool {
        let added = self
            .by_course
            .entry(course_id.to_string())
            .or_default()
            .insert(member_id.to_string());
        self.by_member
            .entry(member_id.to_string())
            .or_default()
            .insert(course_id.to_string());
        added
    }

    /// Returns false when the pair was absent.
    fn remove(&mut self, course_id: &str, member_id: &str) -> bool {
        let removed = self
            .by_course
            .get_mut(course_id)
            .map(|members| members.remove(member_id))
            .unwrap_or(false);
        if let Some(courses) = self.by_member.get_mut(member_id) {
            courses.remove(course_id);
            if courses.is_empty() {
                self.by_member.remove(member_id);
            }
        }
        removed
    }

    fn members_of(&self, course_id: &str) -> Vec<String> {
        self.by_course
            .get(course_id)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn courses_of(&self, member_id: &str) -> Vec<String> {
        self.by_member
            .get(member_id)
            .map(|c| c.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn drop_course(&mut self, course_id: &str) {
        let Some(members) = self.by_course.remove(course_id) else {
            return;
        };
        for member_id in members {
            if let Some(courses) = self.by_member.get_mut(&member_id) {
                courses.remove(course_id);
                if courses.is_empty() {
                    self.by_member.remove(&member_id);
                }
            }
        }
    }
}

#[derive(Default)]
struct Tables {
    courses: HashMap<String, Course>,
    students: Memberships,
    staff: Memberships,
    announcements: HashMap<String, Vec<Announcement>>,
}

impl Tables {
    fn memberships(&self, role: Role) -> &Memberships {
        match role {
            Role::Student => &self.students,
            Role::Staff => &self.staff,
        }
    }

    fn memberships_mut(&mut self, role: Role) -> &mut Memberships {
        match role {
            Role::Student => &mut self.students,
            Role::Staff => &mut self.staff,
        }
    }

    fn require_course(&self, course_id: &str) -> Result<(), StoreError> {
        if !self.courses.contains_key(course_id) {
            return Err(StoreError::not_found(Entity::Course, course_id));
        }
        Ok(())
    }
}

/// Owned, lock-guarded store. Construct one per test to keep state isolated.
#[derive(Default)]
pub struct MemoryCourseStore {
    tables: RwLock<Tables>,
}

impl MemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStore for MemoryCourseStore {
    async fn add_course(&self, course: NewCourse) -> Result<Course, StoreError> {
        validate_new_course(&course)?;
        let mut tables = self.tables.write().await;
        if tables.courses.contains_key(&course.course_id) {
            return Err(StoreError::already_exists(Entity::Course, course.course_id));
        }
        let now = Utc::now();
        let stored = Course {
            course_id: course.course_id,
            course_name: course.course_name,
            semester: course.semester,
            description: course.description,
            created_at: now,
            updated_at: now,
        };
        tables.courses.insert(stored.course_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_course(&self, course_id: &str) -> Result<Course, StoreError> {
        require(course_id, "course id")?;
        let tables = self.tables.read().await;
        tables
            .courses
            .get(course_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Course, course_id))
    }

    async fn update_course(&self, update: CourseUpdate) -> Result<Course, StoreError> {
        require(&update.course_id, "course id")?;
        let update = update.normalized();
        let mut tables = self.tables.write().await;
        let course = tables
            .courses
            .get_mut(&update.course_id)
            .ok_or_else(|| StoreError::not_found(Entity::Course, &update.course_id))?;
        update.apply_to(course);
        course.updated_at = Utc::now();
        Ok(course.clone())
    }

    async fn delete_course(&self, course_id: &str) -> Result<(), StoreError> {
        require(course_id, "course id")?;
        let mut tables = self.tables.write().await;
        if tables.courses.remove(course_id).is_none() {
            return Err(StoreError::not_found(Entity::Course, course_id));
        }
        tables.students.drop_course(course_id);
        tables.staff.drop_course(course_id);
        tables.announcements.remove(course_id);
        Ok(())
    }

    async fn get_courses_by_semester(&self, semester: &str) -> Result<Vec<Course>, StoreError> {
        require(semester, "semester")?;
        let tables = self.tables.read().await;
        let mut courses: Vec<Course> = tables
            .courses
            .values()
            .filter(|c| c.semester == semester)
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.course_id.cmp(&b.course_id));
        Ok(courses)
    }

    async fn add_member(&self, role: Role, course_id: &str, member_id: &str) -> Result<(), StoreError> {
        validate_membership(role, course_id, member_id)?;
        let mut tables = self.tables.write().await;
        tables.require_course(course_id)?;
        if !tables.memberships_mut(role).insert(course_id, member_id) {
            tracing::debug!(%role, course_id, member_id, "membership already present");
        }
        Ok(())
    }

    async fn remove_member(&self, role: Role, course_id: &str, member_id: &str) -> Result<(), StoreError> {
        validate_membership(role, course_id, member_id)?;
        let mut tables = self.tables.write().await;
        tables.require_course(course_id)?;
        if !tables.memberships_mut(role).remove(course_id, member_id) {
            return Err(StoreError::not_found(role.into(), member_id));
        }
        Ok(())
    }

    async fn course_members(&self, role: Role, course_id: &str) -> Result<Vec<String>, StoreError> {
        require(course_id, "course id")?;
        let tables = self.tables.read().await;
        tables.require_course(course_id)?;
        Ok(tables.memberships(role).members_of(course_id))
    }

    async fn member_courses(&self, role: Role, member_id: &str) -> Result<Vec<String>, StoreError> {
        require(member_id, role.id_field())?;
        let tables = self.tables.read().await;
        Ok(tables.memberships(role).courses_of(member_id))
    }

    async fn add_announcement(&self, course_id: &str, announcement: NewAnnouncement) -> Result<Announcement, StoreError> {
        validate_new_announcement(course_id, &announcement)?;
        let announcement_id = announcement.resolved_id();
        let mut tables = self.tables.write().await;
        tables.require_course(course_id)?;
        let list = tables.announcements.entry(course_id.to_string()).or_default();
        if list.iter().any(|a| a.announcement_id == announcement_id) {
            return Err(StoreError::already_exists(Entity::Announcement, announcement_id));
        }
        let now = Utc::now();
        let stored = Announcement {
            announcement_id,
            course_id: course_id.to_string(),
            title: announcement.title,
            content: announcement.content,
            created_at: now,
            updated_at: now,
        };
        list.push(stored.clone());
        Ok(stored)
    }

    async fn get_announcements(&self, course_id: &str) -> Result<Vec<Announcement>, StoreError> {
        require(course_id, "course id")?;
        let tables = self.tables.read().await;
        tables.require_course(course_id)?;
        Ok(tables.announcements.get(course_id).cloned().unwrap_or_default())
    }

    async fn update_announcement(
        &self,
        course_id: &str,
        announcement_id: &str,
        update: AnnouncementUpdate,
    ) -> Result<Announcement, StoreError> {
        require(course_id, "course id")?;
        require(announcement_id, "announcement id")?;
        let update = update.normalized();
        let mut tables = self.tables.write().await;
        tables.require_course(course_id)?;
        let announcement = tables
            .announcements
            .get_mut(course_id)
            .and_then(|list| list.iter_mut().find(|a| a.announcement_id == announcement_id))
            .ok_or_else(|| StoreError::not_found(Entity::Announcement, announcement_id))?;
        update.apply_to(announcement);
        announcement.updated_at = Utc::now();
        Ok(announcement.clone())
    }

    async fn remove_announcement(&self, course_id: &str, announcement_id: &str) -> Result<(), StoreError> {
        require(course_id, "course id")?;
        require(announcement_id, "announcement id")?;
        let mut tables = self.tables.write().await;
        tables.require_course(course_id)?;
        let list = tables.announcements.entry(course_id.to_string()).or_default();
        let before = list.len();
        list.retain(|a| a.announcement_id != announcement_id);
        if list.len() == before {
            return Err(StoreError::not_found(Entity::Announcement, announcement_id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
