//! Configuration for the tplock CLI and daemon.
//!
//! Two JSON files: `config.json` says how to reach the router, and
//! `schedule_config.json` lists the daemon's tasks. Connection settings
//! can be overridden from `TPLOCK_*` environment variables. Everything is
//! translated into `tplock_core` types here so the core never reads disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use tplock_core::{DaemonConfig, RouterConfig, TaskDescriptor};

pub const CONFIG_FILE: &str = "config.json";
pub const SCHEDULE_FILE: &str = "schedule_config.json";
pub const DEFAULT_ROUTER_IP: &str = "192.168.1.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no router password configured (set it in {CONFIG_FILE} or TPLOCK_PASSWORD)")]
    NoCredentials,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config file structs ─────────────────────────────────────────────

/// Contents of `config.json`.
#[derive(Deserialize)]
pub struct ConnectionConfig {
    /// Router address, with or without an `http://` scheme.
    #[serde(default = "default_router_ip")]
    pub router_ip: String,

    /// Router admin password (plaintext on disk, prefer TPLOCK_PASSWORD).
    #[serde(default)]
    pub password: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("router_ip", &self.router_ip)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn default_router_ip() -> String {
    DEFAULT_ROUTER_IP.into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Contents of `schedule_config.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub tasks: Vec<TaskDescriptor>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tplock")
}

fn home_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("tplock");
    p
}

/// Platform config directory (e.g. `~/.config/tplock`).
pub fn config_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config"),
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// Where the daemon writes its log file (e.g. `~/.local/share/tplock/logs`).
pub fn log_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("logs"),
        |dirs| dirs.data_dir().join("logs"),
    )
}

pub fn default_connection_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

pub fn default_schedule_path() -> PathBuf {
    config_dir().join(SCHEDULE_FILE)
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load `config.json` from `path`, then apply `TPLOCK_ROUTER_IP`,
/// `TPLOCK_PASSWORD`, and `TPLOCK_TIMEOUT` on top.
pub fn load_connection(path: &Path) -> Result<ConnectionConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let config = Figment::new()
        .merge(Serialized::default("router_ip", DEFAULT_ROUTER_IP))
        .merge(Serialized::default("timeout", DEFAULT_TIMEOUT_SECS))
        .merge(Json::file(path))
        .merge(Env::prefixed("TPLOCK_").only(&["router_ip", "password", "timeout"]))
        .extract()?;
    Ok(config)
}

/// Load `schedule_config.json` from `path`. An empty task list is valid.
pub fn load_schedule(path: &Path) -> Result<ScheduleConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let schedule = Figment::from(Json::file(path)).extract()?;
    Ok(schedule)
}

// ── Translation to core types ───────────────────────────────────────

impl ConnectionConfig {
    /// Router base URL. A bare address gets `http://` prepended.
    pub fn router_url(&self) -> Result<Url, ConfigError> {
        let raw = self.router_ip.trim();
        if raw.is_empty() {
            return Err(ConfigError::Validation {
                field: "router_ip".into(),
                reason: "must not be empty".into(),
            });
        }

        let with_scheme = if raw.contains("://") {
            raw.to_owned()
        } else {
            format!("http://{raw}")
        };
        Url::parse(&with_scheme).map_err(|e| ConfigError::Validation {
            field: "router_ip".into(),
            reason: format!("'{raw}' is not a valid address: {e}"),
        })
    }

    /// Build a `RouterConfig`. `timeout_override` (seconds) wins over the
    /// file and environment.
    pub fn to_router_config(&self, timeout_override: Option<u64>) -> Result<RouterConfig, ConfigError> {
        let url = self.router_url()?;

        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| SecretString::from(p.to_owned()))
            .ok_or(ConfigError::NoCredentials)?;

        let secs = timeout_override.unwrap_or(self.timeout);
        if secs == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(RouterConfig {
            url,
            password,
            timeout: Duration::from_secs(secs),
        })
    }
}

/// Load both files and assemble what the daemon needs.
pub fn load_daemon_config(
    connection_path: &Path,
    schedule_path: &Path,
    timeout_override: Option<u64>,
) -> Result<DaemonConfig, ConfigError> {
    let schedule = load_schedule(schedule_path)?;
    let router = load_connection(connection_path)?.to_router_config(timeout_override)?;
    Ok(DaemonConfig {
        router,
        tasks: schedule.tasks,
    })
}
