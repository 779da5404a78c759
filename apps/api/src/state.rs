use std::sync::Arc;

use crate::blobs::BlobStore;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::store::DocumentStore;

/// Shared handler state. Cheap to clone, everything heavy lives behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub llm: LlmClient,
    pub config: Arc<Config>,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests() -> Self {
        use crate::blobs::memory::MemBlobs;
        use crate::store::memory::MemStore;

        Self {
            store: Arc::new(MemStore::new()),
            blobs: Arc::new(MemBlobs::new()),
            llm: LlmClient::new("test-key".to_string()),
            config: Arc::new(Config::for_tests()),
        }
    }
}
