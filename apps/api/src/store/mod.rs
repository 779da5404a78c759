//! Document store — user documents plus the shared-job collection, behind a
//! trait so the Postgres backend can be swapped for the in-memory one at
//! startup (`STORE_BACKEND` env) and in tests.
//!
//! `AppState` holds an `Arc<dyn DocumentStore>`.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::SharedJob;
use crate::models::user::{Application, AuthToken, User};

pub mod memory;
pub mod postgres;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Next user id: `1 + max(existing)`, or 1 when no users exist.
    /// Ids are never reused; users are never hard-deleted in scope.
    async fn next_user_id(&self) -> Result<i64>;

    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Full-document replace by id.
    async fn save_user(&self, user: &User) -> Result<()>;

    /// Targeted writes, so token churn never clobbers a concurrent
    /// application edit and vice versa. Everything else is last-writer-wins.
    async fn set_auth_tokens(&self, user_id: i64, tokens: &[AuthToken]) -> Result<()>;
    async fn set_applications(&self, user_id: i64, applications: &[Application]) -> Result<()>;

    async fn list_shared_jobs(&self) -> Result<Vec<SharedJob>>;
    async fn find_shared_job(&self, id: Uuid) -> Result<Option<SharedJob>>;

    /// Creation-time dedup lookup: exact (title, company, link) match,
    /// case-sensitive, link may be absent.
    async fn find_shared_job_posting(
        &self,
        job_title: &str,
        company_name: &str,
        job_link: Option<&str>,
    ) -> Result<Option<SharedJob>>;

    async fn insert_shared_job(&self, job: &SharedJob) -> Result<()>;

    /// Atomic `applied_by += 1`. The one write that is not read-modify-write,
    /// so concurrent applies never lose a count.
    async fn increment_applied_by(&self, id: Uuid) -> Result<()>;
}
