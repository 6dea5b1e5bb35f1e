use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::db::models::{CommentEntry, GradeEntry, Project, ProjectOverview, User};
use crate::db::schema::SQLITE_INIT;
use crate::error::DeskError;
use crate::types::{ProjectStatus, Role};

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the SQLite database with foreign keys on.
pub async fn connect(database_url: &str) -> Result<SqlitePool, DeskError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

/// Data access layer. Every write is a single-statement transaction; the
/// store itself is the only serialization point between requests.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), DeskError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // -- users --

    /// Insert a new user. A UNIQUE violation on `username` surfaces as
    /// `DuplicateUsername` rather than a raw store error.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<i64, DeskError> {
        let result = sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password_hash)
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                    DeskError::DuplicateUsername
                } else {
                    DeskError::Database(e)
                }
            })?;
        Ok(result.last_insert_rowid())
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DeskError> {
        let row = sqlx::query("SELECT id, username, password, role FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DeskError> {
        let row = sqlx::query("SELECT id, username, password, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn count_users(&self) -> Result<i64, DeskError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // -- projects --

    pub async fn create_project(
        &self,
        title: &str,
        description: &str,
        owner_id: i64,
        status: ProjectStatus,
    ) -> Result<i64, DeskError> {
        let result = sqlx::query(
            "INSERT INTO projects (title, description, owner_id, status, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(description)
        .bind(owner_id)
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn find_project_by_id(&self, id: i64) -> Result<Option<Project>, DeskError> {
        let row = sqlx::query(
            "SELECT id, title, description, owner_id, status, updated_at FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_project).transpose()
    }

    pub async fn find_project_overview(
        &self,
        id: i64,
    ) -> Result<Option<ProjectOverview>, DeskError> {
        let row = sqlx::query(
            r#"SELECT p.id, p.title, p.description, p.owner_id, u.username AS owner,
                      p.status, p.updated_at
               FROM projects p JOIN users u ON p.owner_id = u.id
               WHERE p.id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_overview).transpose()
    }

    /// Projects owned by one student, most recently updated first.
    pub async fn list_projects_for_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<ProjectOverview>, DeskError> {
        let rows = sqlx::query(
            r#"SELECT p.id, p.title, p.description, p.owner_id, u.username AS owner,
                      p.status, p.updated_at
               FROM projects p JOIN users u ON p.owner_id = u.id
               WHERE p.owner_id = ?
               ORDER BY p.updated_at DESC"#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_overview).collect()
    }

    /// All projects, most recently updated first.
    pub async fn list_all_projects(&self) -> Result<Vec<ProjectOverview>, DeskError> {
        let rows = sqlx::query(
            r#"SELECT p.id, p.title, p.description, p.owner_id, u.username AS owner,
                      p.status, p.updated_at
               FROM projects p JOIN users u ON p.owner_id = u.id
               ORDER BY p.updated_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_overview).collect()
    }

    /// Rewrite title, description and status, refreshing `updated_at`.
    pub async fn update_project(
        &self,
        id: i64,
        title: &str,
        description: &str,
        status: ProjectStatus,
    ) -> Result<(), DeskError> {
        sqlx::query("UPDATE projects SET title = ?, description = ?, status = ?, updated_at = ? WHERE id = ?")
            .bind(title)
            .bind(description)
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // -- comments --

    pub async fn create_comment(
        &self,
        project_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<i64, DeskError> {
        let result = sqlx::query(
            "INSERT INTO comments (project_id, author_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(project_id)
        .bind(author_id)
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(Self::integrity_error)?;
        Ok(result.last_insert_rowid())
    }

    /// Comments on a project in creation order, joined with author names.
    pub async fn list_comments_for_project(
        &self,
        project_id: i64,
    ) -> Result<Vec<CommentEntry>, DeskError> {
        let rows = sqlx::query(
            r#"SELECT c.id, u.username AS author, c.content, c.created_at
               FROM comments c JOIN users u ON c.author_id = u.id
               WHERE c.project_id = ?
               ORDER BY c.created_at"#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_comment).collect()
    }

    // -- grades --

    pub async fn create_grade(
        &self,
        project_id: i64,
        teacher_id: i64,
        score: i64,
        comment: &str,
    ) -> Result<i64, DeskError> {
        let result = sqlx::query(
            "INSERT INTO grades (project_id, teacher_id, score, comment, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(project_id)
        .bind(teacher_id)
        .bind(score)
        .bind(comment)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(Self::integrity_error)?;
        Ok(result.last_insert_rowid())
    }

    /// Grades on a project in creation order, joined with teacher names.
    /// A project may accumulate several grades from different teachers.
    pub async fn list_grades_for_project(
        &self,
        project_id: i64,
    ) -> Result<Vec<GradeEntry>, DeskError> {
        let rows = sqlx::query(
            r#"SELECT g.id, u.username AS teacher, g.score, g.comment, g.created_at
               FROM grades g JOIN users u ON g.teacher_id = u.id
               WHERE g.project_id = ?
               ORDER BY g.created_at"#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_grade).collect()
    }

    // -- row mapping --

    fn integrity_error(e: sqlx::Error) -> DeskError {
        if matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation()) {
            DeskError::StoreIntegrity("referenced row does not exist".to_string())
        } else {
            DeskError::Database(e)
        }
    }

    fn row_to_user(row: SqliteRow) -> Result<User, DeskError> {
        let role_str: String = row.try_get("role")?;
        let role = Role::parse(&role_str)
            .ok_or_else(|| sqlx::Error::Decode(format!("unrecognized role: {role_str}").into()))?;
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
            role,
        })
    }

    fn row_to_project(row: SqliteRow) -> Result<Project, DeskError> {
        Ok(Project {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            owner_id: row.try_get("owner_id")?,
            status: Self::parse_status(row.try_get("status")?)?,
            updated_at: Self::parse_timestamp(row.try_get("updated_at")?)?,
        })
    }

    fn row_to_overview(row: SqliteRow) -> Result<ProjectOverview, DeskError> {
        Ok(ProjectOverview {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            owner_id: row.try_get("owner_id")?,
            owner: row.try_get("owner")?,
            status: Self::parse_status(row.try_get("status")?)?,
            updated_at: Self::parse_timestamp(row.try_get("updated_at")?)?,
        })
    }

    fn row_to_comment(row: SqliteRow) -> Result<CommentEntry, DeskError> {
        Ok(CommentEntry {
            id: row.try_get("id")?,
            author: row.try_get("author")?,
            content: row.try_get("content")?,
            created_at: Self::parse_timestamp(row.try_get("created_at")?)?,
        })
    }

    fn row_to_grade(row: SqliteRow) -> Result<GradeEntry, DeskError> {
        Ok(GradeEntry {
            id: row.try_get("id")?,
            teacher: row.try_get("teacher")?,
            score: row.try_get("score")?,
            comment: row.try_get("comment")?,
            created_at: Self::parse_timestamp(row.try_get("created_at")?)?,
        })
    }

    fn parse_status(raw: String) -> Result<ProjectStatus, DeskError> {
        ProjectStatus::parse(&raw)
            .ok_or_else(|| sqlx::Error::Decode(format!("unrecognized status: {raw}").into()).into())
    }

    fn parse_timestamp(raw: String) -> Result<DateTime<Utc>, DeskError> {
        Ok(DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc))
    }
}
