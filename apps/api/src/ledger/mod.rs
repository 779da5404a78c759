//! Application Ledger — the per-user ordered record of job applications.
//! Ids are scoped to the owning user and assigned `1 + max(existing)`, so
//! deleting the highest entry does hand its id to the next add.

pub mod handlers;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::user::Application;
use crate::store::DocumentStore;
use crate::users::load_user;

/// Default status for new entries: "1", the wishlist/untracked marker.
pub const DEFAULT_STATUS: &str = "1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub date: Option<String>,
    pub job_link: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

/// Partial update: only the provided fields change.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub date: Option<String>,
    pub job_link: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none()
            && self.company_name.is_none()
            && self.date.is_none()
            && self.job_link.is_none()
            && self.location.is_none()
            && self.status.is_none()
    }

    pub fn apply(&self, application: &mut Application) {
        if let Some(v) = &self.job_title {
            application.job_title = v.clone();
        }
        if let Some(v) = &self.company_name {
            application.company_name = v.clone();
        }
        if let Some(v) = &self.date {
            application.date = Some(v.clone());
        }
        if let Some(v) = &self.job_link {
            application.job_link = Some(v.clone());
        }
        if let Some(v) = &self.location {
            application.location = Some(v.clone());
        }
        if let Some(v) = &self.status {
            application.status = v.clone();
        }
    }
}

pub fn next_application_id(applications: &[Application]) -> i64 {
    applications.iter().map(|a| a.id).max().unwrap_or(0) + 1
}

/// Returns the user's applications verbatim, insertion order.
pub async fn list(store: &dyn DocumentStore, user_id: i64) -> Result<Vec<Application>, AppError> {
    Ok(load_user(store, user_id).await?.applications)
}

/// Appends a new application. `jobTitle` and `companyName` are required;
/// everything else defaults. Shared-pool bookkeeping is the caller's concern
/// (see `pool::apply_and_share`).
pub async fn add(
    store: &dyn DocumentStore,
    user_id: i64,
    req: NewApplication,
) -> Result<Application, AppError> {
    let (Some(job_title), Some(company_name)) = (req.job_title, req.company_name) else {
        return Err(AppError::Validation("Missing fields in input".to_string()));
    };

    let user = load_user(store, user_id).await?;
    let application = Application {
        id: next_application_id(&user.applications),
        job_title,
        company_name,
        date: req.date,
        job_link: req.job_link,
        location: req.location,
        status: req.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
    };

    let mut applications = user.applications;
    applications.push(application.clone());
    store
        .set_applications(user_id, &applications)
        .await
        .map_err(AppError::Internal)?;

    Ok(application)
}

/// Merges a patch into the matching application and persists the full list.
pub async fn update(
    store: &dyn DocumentStore,
    user_id: i64,
    application_id: i64,
    patch: ApplicationPatch,
) -> Result<Application, AppError> {
    if patch.is_empty() {
        return Err(AppError::Validation("No fields found in input".to_string()));
    }

    let user = load_user(store, user_id).await?;
    let mut applications = user.applications;
    let Some(application) = applications.iter_mut().find(|a| a.id == application_id) else {
        return Err(AppError::Validation("Application not found".to_string()));
    };

    patch.apply(application);
    let updated = application.clone();
    store
        .set_applications(user_id, &applications)
        .await
        .map_err(AppError::Internal)?;

    Ok(updated)
}

/// Removes the matching application and returns it.
pub async fn delete(
    store: &dyn DocumentStore,
    user_id: i64,
    application_id: i64,
) -> Result<Application, AppError> {
    let user = load_user(store, user_id).await?;
    let mut applications = user.applications;
    let Some(index) = applications.iter().position(|a| a.id == application_id) else {
        return Err(AppError::Validation("Application not found".to_string()));
    };

    let removed = applications.remove(index);
    store
        .set_applications(user_id, &applications)
        .await
        .map_err(AppError::Internal)?;

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use crate::store::memory::MemStore;

    async fn store_with_user(id: i64) -> MemStore {
        let store = MemStore::new();
        let mut user = User::new(id);
        user.username = Some("alice".to_string());
        store.insert_user(&user).await.unwrap();
        store
    }

    fn new_app(title: &str, company: &str) -> NewApplication {
        NewApplication {
            job_title: Some(title.to_string()),
            company_name: Some(company.to_string()),
            date: None,
            job_link: None,
            location: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn add_defaults_status_and_starts_ids_at_one() {
        let store = store_with_user(1).await;
        let created = add(&store, 1, new_app("Backend Engineer", "Acme"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.status, "1");
        assert!(created.date.is_none());
    }

    #[tokio::test]
    async fn add_requires_title_and_company() {
        let store = store_with_user(1).await;
        let mut req = new_app("Backend Engineer", "Acme");
        req.company_name = None;
        let result = add(&store, 1, req).await;
        assert!(
            matches!(result, Err(AppError::Validation(msg)) if msg == "Missing fields in input")
        );
    }

    #[tokio::test]
    async fn ids_are_max_plus_one_even_after_deleting_the_max() {
        let store = store_with_user(1).await;
        add(&store, 1, new_app("A", "Acme")).await.unwrap();
        let second = add(&store, 1, new_app("B", "Acme")).await.unwrap();
        assert_eq!(second.id, 2);

        delete(&store, 1, 2).await.unwrap();
        // Deleting the max hands its id back to the next add.
        let third = add(&store, 1, new_app("C", "Acme")).await.unwrap();
        assert_eq!(third.id, 2);
    }

    #[tokio::test]
    async fn add_then_list_then_delete_round_trip() {
        let store = store_with_user(1).await;
        let created = add(&store, 1, new_app("Backend Engineer", "Acme"))
            .await
            .unwrap();

        let listed = list(&store, 1).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);

        let removed = delete(&store, 1, created.id).await.unwrap();
        assert_eq!(removed.id, created.id);
        assert!(list(&store, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_only_given_fields() {
        let store = store_with_user(1).await;
        let mut req = new_app("Backend Engineer", "Acme");
        req.location = Some("Remote".to_string());
        add(&store, 1, req).await.unwrap();

        let patch = ApplicationPatch {
            status: Some("3".to_string()),
            ..Default::default()
        };
        let updated = update(&store, 1, 1, patch).await.unwrap();
        assert_eq!(updated.status, "3");
        assert_eq!(updated.job_title, "Backend Engineer");
        assert_eq!(updated.location.as_deref(), Some("Remote"));
    }

    #[tokio::test]
    async fn empty_patch_is_rejected_and_record_unchanged() {
        let store = store_with_user(1).await;
        add(&store, 1, new_app("Backend Engineer", "Acme"))
            .await
            .unwrap();

        let result = update(&store, 1, 1, ApplicationPatch::default()).await;
        assert!(
            matches!(result, Err(AppError::Validation(msg)) if msg == "No fields found in input")
        );

        let listed = list(&store, 1).await.unwrap();
        assert_eq!(listed[0].job_title, "Backend Engineer");
        assert_eq!(listed[0].status, "1");
    }

    #[tokio::test]
    async fn missing_ids_fail_and_leave_the_ledger_alone() {
        let store = store_with_user(1).await;
        add(&store, 1, new_app("Backend Engineer", "Acme"))
            .await
            .unwrap();

        let patch = ApplicationPatch {
            status: Some("2".to_string()),
            ..Default::default()
        };
        let updated = update(&store, 1, 42, patch).await;
        assert!(
            matches!(updated, Err(AppError::Validation(msg)) if msg == "Application not found")
        );

        let deleted = delete(&store, 1, 42).await;
        assert!(
            matches!(deleted, Err(AppError::Validation(msg)) if msg == "Application not found")
        );
        assert_eq!(list(&store, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ids_are_scoped_per_user() {
        let store = store_with_user(1).await;
        let mut bob = User::new(2);
        bob.username = Some("bob".to_string());
        store.insert_user(&bob).await.unwrap();

        let alice_app = add(&store, 1, new_app("SWE", "Acme")).await.unwrap();
        let bob_app = add(&store, 2, new_app("SWE", "Acme")).await.unwrap();
        assert_eq!(alice_app.id, 1);
        assert_eq!(bob_app.id, 1);
    }
}
