use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use storefront_core::assets::DEFAULT_MAX_ASSET_BYTES;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Catalog storage and consistency settings.
    pub catalog: CatalogConfig,
}

/// Settings for the asset store, item locks, and the orphan sweep.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Directory holding uploaded assets, served under `/uploads`.
    pub uploads_dir: PathBuf,
    /// Largest accepted asset in bytes.
    pub max_asset_bytes: u64,
    /// Bound on waiting for an item's lock before answering 409.
    pub lock_timeout_ms: u64,
    /// Interval between background sweeps; `0` disables the job.
    pub sweep_interval_secs: u64,
    /// Minimum age of an unreferenced asset before the sweep removes it.
    pub sweep_grace_secs: u64,
}

impl CatalogConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn sweep_grace(&self) -> Duration {
        Duration::from_secs(self.sweep_grace_secs)
    }

    /// Request body cap: room for one maximal asset plus form overhead, so
    /// oversize uploads reach the asset store's own size check.
    pub fn body_limit_bytes(&self) -> usize {
        usize::try_from(self.max_asset_bytes.saturating_mul(2)).unwrap_or(usize::MAX)
    }

    /// Load catalog settings from environment variables.
    ///
    /// | Env Var                     | Default    |
    /// |-----------------------------|------------|
    /// | `UPLOADS_DIR`               | `uploads`  |
    /// | `MAX_ASSET_BYTES`           | `5242880`  |
    /// | `ITEM_LOCK_TIMEOUT_MS`      | `5000`     |
    /// | `ASSET_SWEEP_INTERVAL_SECS` | `3600`     |
    /// | `ASSET_SWEEP_GRACE_SECS`    | `3600`     |
    pub fn from_env() -> Self {
        Self {
            uploads_dir: std::env::var("UPLOADS_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            max_asset_bytes: env_or("MAX_ASSET_BYTES", DEFAULT_MAX_ASSET_BYTES),
            lock_timeout_ms: env_or("ITEM_LOCK_TIMEOUT_MS", 5000),
            sweep_interval_secs: env_or("ASSET_SWEEP_INTERVAL_SECS", 3600),
            sweep_grace_secs: env_or("ASSET_SWEEP_GRACE_SECS", 3600),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            catalog: CatalogConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
///
/// Panics on a value that does not parse: misconfiguration should fail at startup.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
