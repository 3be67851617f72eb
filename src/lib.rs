//! Course catalog: courses, student and staff memberships, and announcements,
//! stored in PostgreSQL or in memory behind one store contract.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use auth::{AllowAll, Claims, JwtVerifier, TokenVerifier};
pub use config::{AuthMode, Settings, StoreBackend};
pub use error::{AppError, AuthError, ConfigError, Entity, ErrorKind, StoreError};
pub use model::{Announcement, AnnouncementUpdate, Course, CourseUpdate, NewAnnouncement, NewCourse, Role};
pub use routes::{app, common_routes, course_routes};
pub use service::CourseService;
pub use state::AppState;
pub use store::{ensure_database_exists, CourseStore, MemoryCourseStore, PgCourseStore};
