use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::blobs::{BlobStore, StoredResume};

/// In-memory resume store for the `memory` backend and tests.
#[derive(Default)]
pub struct MemBlobs {
    resumes: RwLock<HashMap<i64, StoredResume>>,
}

impl MemBlobs {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemBlobs {
    async fn put(&self, user_id: i64, resume: StoredResume) -> Result<()> {
        self.resumes.write().await.insert(user_id, resume);
        Ok(())
    }

    async fn get(&self, user_id: i64) -> Result<Option<StoredResume>> {
        Ok(self.resumes.read().await.get(&user_id).cloned())
    }
}
