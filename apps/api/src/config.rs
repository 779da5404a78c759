use anyhow::{bail, Context, Result};

/// Which document-store backend to run against.
/// `Memory` exists for local development and tests; `Postgres` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if variables required by the selected backend are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    /// Exact request paths gated by the auth middleware.
    /// Handlers on other routes still parse the bearer token themselves.
    pub protected_paths: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = match std::env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("postgres") | Err(_) => StoreBackend::Postgres,
            Ok(other) => bail!("Unknown STORE_BACKEND '{other}' (expected postgres or memory)"),
        };

        // The memory backend needs no external services beyond the LLM.
        let external = |key: &str| -> Result<String> {
            match store_backend {
                StoreBackend::Postgres => require_env(key),
                StoreBackend::Memory => Ok(std::env::var(key).unwrap_or_default()),
            }
        };

        let protected_paths = std::env::var("PROTECTED_PATHS")
            .unwrap_or_else(|_| "/applications,/resume".to_string())
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Config {
            store_backend,
            database_url: external("DATABASE_URL")?,
            s3_bucket: external("S3_BUCKET")?,
            s3_endpoint: external("S3_ENDPOINT")?,
            aws_access_key_id: external("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: external("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            protected_paths,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Memory-backend config for router-level tests; no env vars involved.
    pub fn for_tests() -> Self {
        Config {
            store_backend: StoreBackend::Memory,
            database_url: String::new(),
            s3_bucket: String::new(),
            s3_endpoint: String::new(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            anthropic_api_key: "test-key".to_string(),
            protected_paths: vec!["/applications".to_string(), "/resume".to_string()],
            port: 0,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
