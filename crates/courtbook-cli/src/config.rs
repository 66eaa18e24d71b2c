//! `courtbook.toml` model.
//!
//! Every section is optional; a missing file yields the defaults below.

use courtbook_gateway::middleware::DEFAULT_CORS_ORIGIN;
use courtbook_security::DEFAULT_IDLE_TIMEOUT;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `admin.password`.
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

#[derive(Debug, Deserialize)]
pub struct CourtbookConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for CourtbookConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            admin: AdminConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_rps")]
    pub max_requests_per_second: f64,
    #[serde(default = "default_burst")]
    pub max_burst: f64,
    /// Seconds a client's rate-limit bucket survives without requests.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Key rate limiting on `X-Forwarded-For`; enable only behind a proxy.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_requests_per_second: default_rps(),
            max_burst: default_burst(),
            idle_timeout_secs: default_idle_timeout_secs(),
            trust_forwarded_for: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Where session records live.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON files under `<data_dir>/sessions`.
    #[default]
    File,
    /// Process memory; lost on exit.
    Memory,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_cors_origins() -> Vec<String> {
    vec![DEFAULT_CORS_ORIGIN.to_string()]
}
fn default_rps() -> f64 {
    10.0
}
fn default_burst() -> f64 {
    50.0
}
fn default_idle_timeout_secs() -> u64 {
    DEFAULT_IDLE_TIMEOUT.as_secs()
}

impl CourtbookConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {e}", path.display())
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// The admin password: environment first, then the config file.
    pub fn admin_password(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|v| !v.is_empty())
            .or_else(|| self.admin.password.clone())
    }

    /// Directory holding session records.
    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }
}
