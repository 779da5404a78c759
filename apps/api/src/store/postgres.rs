use anyhow::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::job::SharedJob;
use crate::models::user::{Application, AuthToken, User};
use crate::store::DocumentStore;

/// Postgres-backed document store. Users are single rows with the embedded
/// lists (tokens, applications, preferences) as JSONB columns, keeping the
/// one-document-per-user shape.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Creates the two tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id            BIGINT PRIMARY KEY,
                username      TEXT UNIQUE,
                password_hash TEXT,
                full_name     TEXT NOT NULL DEFAULT '',
                email         TEXT NOT NULL DEFAULT '',
                phone_number  TEXT NOT NULL DEFAULT '',
                address       TEXT NOT NULL DEFAULT '',
                institution   TEXT NOT NULL DEFAULT '',
                auth_tokens   JSONB NOT NULL DEFAULT '[]',
                applications  JSONB NOT NULL DEFAULT '[]',
                skills        JSONB NOT NULL DEFAULT '[]',
                job_levels    JSONB NOT NULL DEFAULT '[]',
                locations     JSONB NOT NULL DEFAULT '[]',
                analyses      JSONB NOT NULL DEFAULT '[]'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS shared_jobs (
                id           UUID PRIMARY KEY,
                job_title    TEXT NOT NULL,
                company_name TEXT NOT NULL,
                location     TEXT NOT NULL DEFAULT '',
                job_link     TEXT,
                posted_by    BIGINT NOT NULL,
                posted_date  TIMESTAMPTZ NOT NULL DEFAULT now(),
                applied_by   BIGINT NOT NULL DEFAULT 1,
                active       BIGINT NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database schema ensured");
        Ok(())
    }
}

/// Row mapping for the users table; the JSONB columns come back through
/// `sqlx::types::Json` and are unwrapped into the domain model.
#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: Option<String>,
    password_hash: Option<String>,
    full_name: String,
    email: String,
    phone_number: String,
    address: String,
    institution: String,
    auth_tokens: Json<Vec<AuthToken>>,
    applications: Json<Vec<Application>>,
    skills: Json<Vec<String>>,
    job_levels: Json<Vec<String>>,
    locations: Json<Vec<String>>,
    analyses: Json<Vec<serde_json::Value>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            address: row.address,
            institution: row.institution,
            auth_tokens: row.auth_tokens.0,
            applications: row.applications.0,
            skills: row.skills.0,
            job_levels: row.job_levels.0,
            locations: row.locations.0,
            analyses: row.analyses.0,
        }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn next_user_id(&self) -> Result<i64> {
        let (next,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(id), 0) + 1 FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(next)
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, username, password_hash, full_name, email, phone_number,
                 address, institution, auth_tokens, applications, skills,
                 job_levels, locations, analyses)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(&user.institution)
        .bind(Json(&user.auth_tokens))
        .bind(Json(&user.applications))
        .bind(Json(&user.skills))
        .bind(Json(&user.job_levels))
        .bind(Json(&user.locations))
        .bind(Json(&user.analyses))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                username = $2, password_hash = $3, full_name = $4, email = $5,
                phone_number = $6, address = $7, institution = $8,
                auth_tokens = $9, applications = $10, skills = $11,
                job_levels = $12, locations = $13, analyses = $14
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(&user.institution)
        .bind(Json(&user.auth_tokens))
        .bind(Json(&user.applications))
        .bind(Json(&user.skills))
        .bind(Json(&user.job_levels))
        .bind(Json(&user.locations))
        .bind(Json(&user.analyses))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_auth_tokens(&self, user_id: i64, tokens: &[AuthToken]) -> Result<()> {
        sqlx::query("UPDATE users SET auth_tokens = $2 WHERE id = $1")
            .bind(user_id)
            .bind(Json(tokens))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_applications(&self, user_id: i64, applications: &[Application]) -> Result<()> {
        sqlx::query("UPDATE users SET applications = $2 WHERE id = $1")
            .bind(user_id)
            .bind(Json(applications))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_shared_jobs(&self) -> Result<Vec<SharedJob>> {
        let jobs = sqlx::query_as("SELECT * FROM shared_jobs ORDER BY posted_date")
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn find_shared_job(&self, id: Uuid) -> Result<Option<SharedJob>> {
        let job = sqlx::query_as("SELECT * FROM shared_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn find_shared_job_posting(
        &self,
        job_title: &str,
        company_name: &str,
        job_link: Option<&str>,
    ) -> Result<Option<SharedJob>> {
        let job = sqlx::query_as(
            r#"
            SELECT * FROM shared_jobs
            WHERE job_title = $1 AND company_name = $2
              AND job_link IS NOT DISTINCT FROM $3
            LIMIT 1
            "#,
        )
        .bind(job_title)
        .bind(company_name)
        .bind(job_link)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn insert_shared_job(&self, job: &SharedJob) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO shared_jobs
                (id, job_title, company_name, location, job_link,
                 posted_by, posted_date, applied_by, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(job.id)
        .bind(&job.job_title)
        .bind(&job.company_name)
        .bind(&job.location)
        .bind(&job.job_link)
        .bind(job.posted_by)
        .bind(job.posted_date)
        .bind(job.applied_by)
        .bind(job.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn increment_applied_by(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE shared_jobs SET applied_by = applied_by + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
