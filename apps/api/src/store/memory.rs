use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::job::SharedJob;
use crate::models::user::{Application, AuthToken, User};
use crate::store::DocumentStore;

/// In-memory document store. Backs the `memory` STORE_BACKEND for local
/// development and is what the unit tests run against.
///
/// Shared jobs keep insertion order so listings iterate the pool the way the
/// Postgres backend does.
#[derive(Default)]
pub struct MemStore {
    users: RwLock<HashMap<i64, User>>,
    jobs: RwLock<Vec<SharedJob>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn next_user_id(&self) -> Result<i64> {
        Ok(self.users.read().await.keys().max().copied().unwrap_or(0) + 1)
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn set_auth_tokens(&self, user_id: i64, tokens: &[AuthToken]) -> Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.auth_tokens = tokens.to_vec();
        }
        Ok(())
    }

    async fn set_applications(&self, user_id: i64, applications: &[Application]) -> Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.applications = applications.to_vec();
        }
        Ok(())
    }

    async fn list_shared_jobs(&self) -> Result<Vec<SharedJob>> {
        Ok(self.jobs.read().await.clone())
    }

    async fn find_shared_job(&self, id: Uuid) -> Result<Option<SharedJob>> {
        Ok(self.jobs.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn find_shared_job_posting(
        &self,
        job_title: &str,
        company_name: &str,
        job_link: Option<&str>,
    ) -> Result<Option<SharedJob>> {
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .find(|j| {
                j.job_title == job_title
                    && j.company_name == company_name
                    && j.job_link.as_deref() == job_link
            })
            .cloned())
    }

    async fn insert_shared_job(&self, job: &SharedJob) -> Result<()> {
        self.jobs.write().await.push(job.clone());
        Ok(())
    }

    async fn increment_applied_by(&self, id: Uuid) -> Result<()> {
        if let Some(job) = self.jobs.write().await.iter_mut().find(|j| j.id == id) {
            job.applied_by += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn next_user_id_starts_at_one_and_tracks_max() {
        let store = MemStore::new();
        assert_eq!(store.next_user_id().await.unwrap(), 1);

        let mut user = User::new(7);
        user.username = Some("dana".to_string());
        store.insert_user(&user).await.unwrap();
        assert_eq!(store.next_user_id().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn increment_applied_by_is_per_job() {
        let store = MemStore::new();
        let a = SharedJob::new("SRE".into(), "Acme".into(), String::new(), None, 1);
        let b = SharedJob::new("SWE".into(), "Globex".into(), String::new(), None, 1);
        store.insert_shared_job(&a).await.unwrap();
        store.insert_shared_job(&b).await.unwrap();

        store.increment_applied_by(a.id).await.unwrap();
        store.increment_applied_by(a.id).await.unwrap();

        let jobs = store.list_shared_jobs().await.unwrap();
        assert_eq!(jobs[0].applied_by, 3);
        assert_eq!(jobs[1].applied_by, 1);
    }
}
