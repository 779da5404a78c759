//! Shared Job Pool — the cross-user registry of job postings.
//!
//! Two dedup keys coexist on purpose. Creation dedups on the exact
//! (jobTitle, companyName, jobLink) triple, case-sensitive. Listing filters
//! on company+link only, case-insensitive — "same posting, possibly
//! differently titled". The mismatch is inherited behavior that clients
//! depend on; do not unify the two without a product decision.

pub mod handlers;

use std::collections::HashSet;

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ledger::{self, next_application_id, NewApplication};
use crate::models::job::{SharedJob, SharedJobView};
use crate::models::user::Application;
use crate::store::DocumentStore;
use crate::users::load_user;

#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    #[serde(rename = "jobId")]
    pub job_id: Option<String>,
}

/// Listing-side dedup key. A missing link keys as the empty string.
pub fn listing_key(company_name: &str, job_link: Option<&str>) -> String {
    format!(
        "{}:{}",
        company_name.to_lowercase(),
        job_link.unwrap_or("").to_lowercase()
    )
}

/// Pool entries minus anything the user has already applied to, in pool
/// iteration order.
pub fn visible_jobs(jobs: &[SharedJob], applications: &[Application]) -> Vec<SharedJobView> {
    let applied: HashSet<String> = applications
        .iter()
        .map(|a| listing_key(&a.company_name, a.job_link.as_deref()))
        .collect();

    jobs.iter()
        .filter(|job| !applied.contains(&listing_key(&job.company_name, job.job_link.as_deref())))
        .map(SharedJobView::from)
        .collect()
}

/// Records an application in the user's ledger, then updates the shared pool.
/// The ledger write is authoritative and always returned; pool bookkeeping is
/// best-effort with its own logged failure channel and can never alter the
/// response.
pub async fn apply_and_share(
    store: &dyn DocumentStore,
    user_id: i64,
    req: NewApplication,
) -> Result<Application, AppError> {
    let application = ledger::add(store, user_id, req).await?;

    if let Err(err) = record_posting(store, user_id, &application).await {
        warn!("Shared-pool bookkeeping failed for user {user_id}: {err:#}");
    }

    Ok(application)
}

/// Creation-time dedup: an exact triple match bumps the counter, anything
/// else becomes a new posting credited to this user. Two racing first-adds
/// can both see "not found" and insert twice; accepted, no CAS here.
async fn record_posting(
    store: &dyn DocumentStore,
    user_id: i64,
    application: &Application,
) -> anyhow::Result<()> {
    match store
        .find_shared_job_posting(
            &application.job_title,
            &application.company_name,
            application.job_link.as_deref(),
        )
        .await?
    {
        Some(job) => store.increment_applied_by(job.id).await,
        None => {
            let job = SharedJob::new(
                application.job_title.clone(),
                application.company_name.clone(),
                application.location.clone().unwrap_or_default(),
                application.job_link.clone(),
                user_id,
            );
            store.insert_shared_job(&job).await
        }
    }
}

/// Builds a personal application from a shared posting: today's date, the
/// wishlist status, a fresh per-user id. The applied counter bump afterwards
/// is best-effort, consistent with the add path.
pub async fn add_to_wishlist(
    store: &dyn DocumentStore,
    user_id: i64,
    job_id: Uuid,
) -> Result<Application, AppError> {
    let job = store
        .find_shared_job(job_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Job not found in shared listings".to_string()))?;

    let user = load_user(store, user_id).await?;
    let application = Application {
        id: next_application_id(&user.applications),
        job_title: job.job_title.clone(),
        company_name: job.company_name.clone(),
        date: Some(Utc::now().format("%Y-%m-%d").to_string()),
        job_link: job.job_link.clone(),
        location: Some(job.location.clone()),
        status: ledger::DEFAULT_STATUS.to_string(),
    };

    let mut applications = user.applications;
    applications.push(application.clone());
    store
        .set_applications(user_id, &applications)
        .await
        .map_err(AppError::Internal)?;

    if let Err(err) = store.increment_applied_by(job.id).await {
        warn!("appliedBy increment failed for shared job {}: {err:#}", job.id);
    }

    Ok(application)
}

/// GET /jobs/shared backing operation.
pub async fn shared_jobs_for(
    store: &dyn DocumentStore,
    user_id: i64,
) -> Result<Vec<SharedJobView>, AppError> {
    let user = load_user(store, user_id).await?;
    let jobs = store.list_shared_jobs().await.map_err(AppError::Internal)?;
    Ok(visible_jobs(&jobs, &user.applications))
}
