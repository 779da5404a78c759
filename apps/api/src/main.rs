mod auth;
mod blobs;
mod config;
mod db;
mod errors;
mod insights;
mod ledger;
mod llm_client;
mod models;
mod pool;
mod resume;
mod routes;
mod state;
mod store;
mod users;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::blobs::{memory::MemBlobs, s3::S3Blobs, BlobStore};
use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{memory::MemStore, postgres::PgStore, DocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AppTracker API v{}", env!("CARGO_PKG_VERSION"));

    let (store, blobs): (Arc<dyn DocumentStore>, Arc<dyn BlobStore>) = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database_url).await?;
            let store = PgStore::new(pool);
            store.ensure_schema().await?;

            let s3 = build_s3_client(&config).await;
            info!("S3 client initialized");

            (
                Arc::new(store),
                Arc::new(S3Blobs::new(s3, config.s3_bucket.clone())),
            )
        }
        StoreBackend::Memory => {
            info!("Using in-memory stores; all data is lost on shutdown");
            (Arc::new(MemStore::new()), Arc::new(MemBlobs::new()))
        }
    };

    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let port = config.port;
    let state = AppState {
        store,
        blobs,
        llm,
        config: Arc::new(config),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "apptracker-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
