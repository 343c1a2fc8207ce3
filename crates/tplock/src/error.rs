//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct process exit code.

use miette::Diagnostic;
use thiserror::Error;

use tplock_config::ConfigError;
use tplock_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to router at {url}")]
    #[diagnostic(
        code(tplock::connection_failed),
        help(
            "Check that the router is reachable from this machine.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Router request timed out after {seconds}s")]
    #[diagnostic(
        code(tplock::timeout),
        help("Increase the timeout with --timeout or in config.json.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Router login failed: {message}")]
    #[diagnostic(
        code(tplock::auth_failed),
        help("Check the admin password in config.json or TPLOCK_PASSWORD.")
    )]
    AuthFailed { message: String },

    #[error("No router password configured")]
    #[diagnostic(
        code(tplock::no_credentials),
        help("Add \"password\" to config.json or set TPLOCK_PASSWORD.")
    )]
    NoCredentials,

    // ── Devices ──────────────────────────────────────────────────────

    #[error("Device '{identifier}' not found")]
    #[diagnostic(
        code(tplock::not_found),
        help("Run: tplock devices to see what the router currently reports")
    )]
    NotFound { identifier: String },

    #[error("Router did not apply the change to {device}")]
    #[diagnostic(
        code(tplock::not_applied),
        help("The router answered with an error status. Run with -v for details.")
    )]
    NotApplied { device: String },

    #[error("Router rejected the request (error_code {code})")]
    #[diagnostic(code(tplock::rejected))]
    Rejected { code: i64 },

    #[error("Unexpected router response: {message}")]
    #[diagnostic(code(tplock::protocol))]
    Protocol { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tplock::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(tplock::no_config),
        help("Create it, or point at another file with --config (or the schedule path argument).")
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(tplock::config))]
    Config { message: String },

    #[error("Invalid task '{task}': {reason}")]
    #[diagnostic(code(tplock::invalid_task))]
    InvalidTask { task: String, reason: String },

    // ── IO / Interactive ─────────────────────────────────────────────

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(tplock::prompt))]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::NoConfig { .. } | Self::Config { .. } | Self::InvalidTask { .. } => {
                exit_code::CONFIG
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::NotAuthenticated => Self::AuthFailed {
                message: "not logged in".into(),
            },
            CoreError::DeviceNotFound { identifier } => Self::NotFound { identifier },
            CoreError::InvalidSelector => Self::Validation {
                field: "device".into(),
                reason: "pass --mac, --name, or both".into(),
            },
            CoreError::Rejected { code } => Self::Rejected { code },
            CoreError::Protocol { message } => Self::Protocol { message },
            CoreError::Config { message } => Self::Config { message },
            CoreError::TaskConfig { task, reason } => Self::InvalidTask { task, reason },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::NoCredentials => Self::NoCredentials,
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Figment(e) => Self::Config {
                message: e.to_string(),
            },
        }
    }
}
