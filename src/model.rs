//! Entity model: courses, announcements and the course membership roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A stored course. `course_id` is caller-supplied and globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub course_id: String,
    pub course_name: String,
    pub semester: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a course.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCourse {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCourse {
    pub fn new(course_id: impl Into<String>, course_name: impl Into<String>, semester: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            course_name: course_name.into(),
            semester: semester.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial course update. `None` leaves the stored field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseUpdate {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CourseUpdate {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            ..Default::default()
        }
    }

    /// Empty strings arrive from callers that did not set a field; treat them as absent.
    pub fn normalized(self) -> Self {
        Self {
            course_id: self.course_id,
            course_name: non_empty(self.course_name),
            semester: non_empty(self.semester),
            description: non_empty(self.description),
        }
    }

    /// Overwrite the fields of `course` that this update carries.
    pub fn apply_to(&self, course: &mut Course) {
        if let Some(name) = &self.course_name {
            course.course_name = name.clone();
        }
        if let Some(semester) = &self.semester {
            course.semester = semester.clone();
        }
        if let Some(description) = &self.description {
            course.description = Some(description.clone());
        }
    }
}

/// A course-scoped announcement, unique by (`course_id`, `announcement_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub announcement_id: String,
    pub course_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for posting an announcement. An empty id is replaced by a generated one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAnnouncement {
    #[serde(default)]
    pub announcement_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewAnnouncement {
    pub fn new(announcement_id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            announcement_id: announcement_id.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }

    /// Returns the caller's id, or a fresh UUID when none was supplied.
    pub fn resolved_id(&self) -> String {
        if self.announcement_id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            self.announcement_id.clone()
        }
    }
}

/// Partial announcement update. `None` leaves the stored field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnouncementUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl AnnouncementUpdate {
    pub fn normalized(self) -> Self {
        Self {
            title: non_empty(self.title),
            content: non_empty(self.content),
        }
    }

    pub fn apply_to(&self, announcement: &mut Announcement) {
        if let Some(title) = &self.title {
            announcement.title = title.clone();
        }
        if let Some(content) = &self.content {
            announcement.content = content.clone();
        }
    }
}

/// Which side of a course membership an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Staff,
}

impl Role {
    /// Association table backing this role.
    pub fn table(self) -> &'static str {
        match self {
            Role::Student => "course_student",
            Role::Staff => "course_staff",
        }
    }

    /// Column holding the member id in [`Role::table`].
    pub fn column(self) -> &'static str {
        match self {
            Role::Student => "student_id",
            Role::Staff => "staff_id",
        }
    }

    /// Field name reported when the member id is empty.
    pub fn id_field(self) -> &'static str {
        match self {
            Role::Student => "student id",
            Role::Staff => "staff id",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => f.write_str("student"),
            Role::Staff => f.write_str("staff"),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
