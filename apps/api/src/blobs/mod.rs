//! Resume blob storage, keyed by user id with replace semantics.
//!
//! Carried in `AppState` as `Arc<dyn BlobStore>`; S3/MinIO in production,
//! in-memory for the `memory` backend and tests.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

pub mod memory;
pub mod s3;

/// A stored resume: at most one per user.
#[derive(Debug, Clone)]
pub struct StoredResume {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores or replaces the user's resume.
    async fn put(&self, user_id: i64, resume: StoredResume) -> Result<()>;

    /// Fetches the user's resume, if one has ever been uploaded.
    async fn get(&self, user_id: i64) -> Result<Option<StoredResume>>;
}
