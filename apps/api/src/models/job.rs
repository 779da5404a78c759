use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting shared across the whole user pool.
///
/// Deduplicated at creation time on the exact (jobTitle, companyName, jobLink)
/// triple; `applied_by` counts how many users have applied and only ever goes
/// up.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SharedJob {
    pub id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_link: Option<String>,
    /// User id of whoever first shared the posting.
    pub posted_by: i64,
    pub posted_date: DateTime<Utc>,
    pub applied_by: i64,
    /// Whether the posting is still open. Stored but not acted on.
    pub active: i64,
}

impl SharedJob {
    pub fn new(
        job_title: String,
        company_name: String,
        location: String,
        job_link: Option<String>,
        posted_by: i64,
    ) -> Self {
        SharedJob {
            id: Uuid::new_v4(),
            job_title,
            company_name,
            location,
            job_link,
            posted_by,
            posted_date: Utc::now(),
            applied_by: 1,
            active: 1,
        }
    }
}

/// The listing shape emitted by GET /jobs/shared.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedJobView {
    pub id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_link: Option<String>,
    /// `posted_date` formatted as an ISO date.
    pub date: String,
    pub applied_by: i64,
}

impl From<&SharedJob> for SharedJobView {
    fn from(job: &SharedJob) -> Self {
        SharedJobView {
            id: job.id,
            job_title: job.job_title.clone(),
            company_name: job.company_name.clone(),
            location: job.location.clone(),
            job_link: job.job_link.clone(),
            date: job.posted_date.format("%Y-%m-%d").to_string(),
            applied_by: job.applied_by,
        }
    }
}
