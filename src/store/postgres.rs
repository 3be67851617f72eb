//! PostgreSQL-backed course store: schema DDL and the store contract over `sqlx`.

use super::{require, validate_membership, validate_new_announcement, validate_new_course, CourseStore};
use crate::error::{Entity, StoreError};
use crate::model::{Announcement, AnnouncementUpdate, Course, CourseUpdate, NewAnnouncement, NewCourse, Role};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{ConnectOptions, PgExecutor, PgPool};
use std::str::FromStr;

const COURSE_COLUMNS: &str = "course_id, course_name, semester, description, created_at, updated_at";
const ANNOUNCEMENT_COLUMNS: &str = "announcement_id, course_id, title, content, created_at, updated_at";

/// Tables owned by a course, in the order a cascading delete clears them.
const COURSE_CHILD_TABLES: &[&str] = &["course_student", "course_staff", "announcements"];

const SCHEMA_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        course_id TEXT PRIMARY KEY,
        course_name TEXT NOT NULL,
        semester TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_student (
        course_id TEXT NOT NULL,
        student_id TEXT NOT NULL,
        PRIMARY KEY (course_id, student_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_staff (
        course_id TEXT NOT NULL,
        staff_id TEXT NOT NULL,
        PRIMARY KEY (course_id, staff_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS announcements (
        announcement_id TEXT NOT NULL,
        course_id TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (course_id, announcement_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS courses_semester_idx ON courses (semester)",
    "CREATE INDEX IF NOT EXISTS course_student_student_idx ON course_student (student_id)",
    "CREATE INDEX IF NOT EXISTS course_staff_staff_idx ON course_staff (staff_id)",
];

#[derive(Clone)]
pub struct PgCourseStore {
    pool: PgPool,
}

impl PgCourseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create tables and indexes if they do not exist. Safe to run on every start.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for ddl in SCHEMA_DDL {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        tracing::info!("database schema initialized");
        Ok(())
    }

    async fn course_exists<'e, E: PgExecutor<'e>>(executor: E, course_id: &str) -> Result<bool, StoreError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM courses WHERE course_id = $1)")
            .bind(course_id)
            .fetch_one(executor)
            .await?;
        Ok(exists.0)
    }

    async fn require_course(&self, course_id: &str) -> Result<(), StoreError> {
        if !Self::course_exists(&self.pool, course_id).await? {
            return Err(StoreError::not_found(Entity::Course, course_id));
        }
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl CourseStore for PgCourseStore {
    async fn add_course(&self, course: NewCourse) -> Result<Course, StoreError> {
        validate_new_course(&course)?;
        let sql = format!(
            "INSERT INTO courses (course_id, course_name, semester, description) VALUES ($1, $2, $3, $4) RETURNING {}",
            COURSE_COLUMNS
        );
        tracing::debug!(sql = %sql, course_id = %course.course_id, "query");
        sqlx::query_as::<_, Course>(&sql)
            .bind(&course.course_id)
            .bind(&course.course_name)
            .bind(&course.semester)
            .bind(&course.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::already_exists(Entity::Course, &course.course_id)
                } else {
                    StoreError::Db(e)
                }
            })
    }

    async fn get_course(&self, course_id: &str) -> Result<Course, StoreError> {
        require(course_id, "course id")?;
        let sql = format!("SELECT {} FROM courses WHERE course_id = $1", COURSE_COLUMNS);
        tracing::debug!(sql = %sql, course_id, "query");
        sqlx::query_as::<_, Course>(&sql)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Course, course_id))
    }

    async fn update_course(&self, update: CourseUpdate) -> Result<Course, StoreError> {
        require(&update.course_id, "course id")?;
        let update = update.normalized();
        let sql = format!(
            r#"
            UPDATE courses
            SET course_name = COALESCE($2, course_name),
                semester = COALESCE($3, semester),
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE course_id = $1
            RETURNING {}
            "#,
            COURSE_COLUMNS
        );
        tracing::debug!(sql = %sql, course_id = %update.course_id, "query");
        sqlx::query_as::<_, Course>(&sql)
            .bind(&update.course_id)
            .bind(&update.course_name)
            .bind(&update.semester)
            .bind(&update.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Course, &update.course_id))
    }

    async fn delete_course(&self, course_id: &str) -> Result<(), StoreError> {
        require(course_id, "course id")?;
        tracing::debug!(course_id, tables = ?COURSE_CHILD_TABLES, "delete course with cascade");
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM courses WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::not_found(Entity::Course, course_id));
        }
        for table in COURSE_CHILD_TABLES {
            let removed = sqlx::query(&format!("DELETE FROM {} WHERE course_id = $1", table))
                .bind(course_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(table, course_id, removed, "cascade delete");
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_courses_by_semester(&self, semester: &str) -> Result<Vec<Course>, StoreError> {
        require(semester, "semester")?;
        let sql = format!("SELECT {} FROM courses WHERE semester = $1 ORDER BY course_id", COURSE_COLUMNS);
        tracing::debug!(sql = %sql, semester, "query");
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(semester)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn add_member(&self, role: Role, course_id: &str, member_id: &str) -> Result<(), StoreError> {
        validate_membership(role, course_id, member_id)?;
        let sql = format!(
            "INSERT INTO {} (course_id, {}) SELECT course_id, $2 FROM courses WHERE course_id = $1 FOR SHARE ON CONFLICT DO NOTHING",
            role.table(),
            role.column()
        );
        tracing::debug!(sql = %sql, course_id, member_id, "query");
        let inserted = sqlx::query(&sql)
            .bind(course_id)
            .bind(member_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        // FOR SHARE makes the insert wait on an in-flight delete of the course.
        // Zero rows means either an existing pair (fine) or a missing course.
        if inserted == 0 {
            self.require_course(course_id).await?;
        }
        Ok(())
    }

    async fn remove_member(&self, role: Role, course_id: &str, member_id: &str) -> Result<(), StoreError> {
        validate_membership(role, course_id, member_id)?;
        let sql = format!("DELETE FROM {} WHERE course_id = $1 AND {} = $2", role.table(), role.column());
        tracing::debug!(sql = %sql, course_id, member_id, "query");
        let removed = sqlx::query(&sql)
            .bind(course_id)
            .bind(member_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if removed == 0 {
            self.require_course(course_id).await?;
            return Err(StoreError::not_found(role.into(), member_id));
        }
        Ok(())
    }

    async fn course_members(&self, role: Role, course_id: &str) -> Result<Vec<String>, StoreError> {
        require(course_id, "course id")?;
        self.require_course(course_id).await?;
        let sql = format!(
            "SELECT {col} FROM {} WHERE course_id = $1 ORDER BY {col}",
            role.table(),
            col = role.column()
        );
        tracing::debug!(sql = %sql, course_id, "query");
        Ok(sqlx::query_scalar::<_, String>(&sql)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn member_courses(&self, role: Role, member_id: &str) -> Result<Vec<String>, StoreError> {
        require(member_id, role.id_field())?;
        let sql = format!(
            "SELECT course_id FROM {} WHERE {} = $1 ORDER BY course_id",
            role.table(),
            role.column()
        );
        tracing::debug!(sql = %sql, member_id, "query");
        Ok(sqlx::query_scalar::<_, String>(&sql)
            .bind(member_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn add_announcement(&self, course_id: &str, announcement: NewAnnouncement) -> Result<Announcement, StoreError> {
        validate_new_announcement(course_id, &announcement)?;
        let announcement_id = announcement.resolved_id();
        let sql = format!(
            r#"
            INSERT INTO announcements (announcement_id, course_id, title, content)
            SELECT $1, course_id, $3, $4 FROM courses
            WHERE course_id = $2
            FOR SHARE
            RETURNING {}
            "#,
            ANNOUNCEMENT_COLUMNS
        );
        tracing::debug!(sql = %sql, course_id, announcement_id = %announcement_id, "query");
        let row = sqlx::query_as::<_, Announcement>(&sql)
            .bind(&announcement_id)
            .bind(course_id)
            .bind(&announcement.title)
            .bind(&announcement.content)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::already_exists(Entity::Announcement, &announcement_id)
                } else {
                    StoreError::Db(e)
                }
            })?;
        row.ok_or_else(|| StoreError::not_found(Entity::Course, course_id))
    }

    async fn get_announcements(&self, course_id: &str) -> Result<Vec<Announcement>, StoreError> {
        require(course_id, "course id")?;
        self.require_course(course_id).await?;
        let sql = format!(
            "SELECT {} FROM announcements WHERE course_id = $1 ORDER BY created_at, announcement_id",
            ANNOUNCEMENT_COLUMNS
        );
        tracing::debug!(sql = %sql, course_id, "query");
        Ok(sqlx::query_as::<_, Announcement>(&sql)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?)
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
        let sql = format!(
            r#"
            UPDATE announcements
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE course_id = $1 AND announcement_id = $2
            RETURNING {}
            "#,
            ANNOUNCEMENT_COLUMNS
        );
        tracing::debug!(sql = %sql, course_id, announcement_id, "query");
        let row = sqlx::query_as::<_, Announcement>(&sql)
            .bind(course_id)
            .bind(announcement_id)
            .bind(&update.title)
            .bind(&update.content)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(a) => Ok(a),
            None => {
                self.require_course(course_id).await?;
                Err(StoreError::not_found(Entity::Announcement, announcement_id))
            }
        }
    }

    async fn remove_announcement(&self, course_id: &str, announcement_id: &str) -> Result<(), StoreError> {
        require(course_id, "course id")?;
        require(announcement_id, "announcement id")?;
        let sql = "DELETE FROM announcements WHERE course_id = $1 AND announcement_id = $2";
        tracing::debug!(sql, course_id, announcement_id, "query");
        let removed = sqlx::query(sql)
            .bind(course_id)
            .bind(announcement_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if removed == 0 {
            self.require_course(course_id).await?;
            return Err(StoreError::not_found(Entity::Announcement, announcement_id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        tracing::debug!(sql = "SELECT 1", "ping");
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if exists.0 {
        tracing::debug!(database = %db_name, "database already exists");
        return Ok(());
    }
    sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
        .execute(&mut conn)
        .await?;
    tracing::info!(database = %db_name, "database created");
    Ok(())
}

/// Split `database_url` into an admin URL on the `postgres` database and the target
/// database name. The name is empty when the URL has no path.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let authority_start = url
        .find("://")
        .ok_or_else(|| sqlx::Error::Configuration("DATABASE_URL: missing scheme".into()))?
        + 3;
    let (base, query) = match url.find('?') {
        Some(q) => (&url[..q], &url[q..]),
        None => (url, ""),
    };
    match base.get(authority_start..).and_then(|rest| rest.find('/')) {
        Some(slash) => {
            let path_start = authority_start + slash + 1;
            let db_name = base[path_start..].trim().to_string();
            Ok((format!("{}postgres{}", &base[..path_start], query), db_name))
        }
        None => Ok((format!("{}/postgres{}", base, query), String::new())),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
