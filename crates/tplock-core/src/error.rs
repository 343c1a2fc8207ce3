// ── Core error types ──
//
// User-facing errors from tplock-core. Consumers never see HTTP status
// codes or JSON parse failures directly. The `From<tplock_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in to the router")]
    NotAuthenticated,

    // ── Network errors ───────────────────────────────────────────────
    #[error("Cannot reach router at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Router request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Router rejected request (error_code {code})")]
    Rejected { code: i64 },

    #[error("Unexpected router response: {message}")]
    Protocol { message: String },

    // ── Resolution errors ────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("A device MAC address or name is required")]
    InvalidSelector,

    // ── Task errors ──────────────────────────────────────────────────
    #[error("Invalid task '{task}': {reason}")]
    TaskConfig { task: String, reason: String },
}

impl CoreError {
    /// Timeouts, connection failures, and non-zero router statuses on
    /// authenticated calls.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::Timeout { .. }
                | Self::Rejected { .. }
                | Self::Protocol { .. }
        )
    }

    pub(crate) fn task_config(task: &str, reason: impl Into<String>) -> Self {
        Self::TaskConfig {
            task: task.to_owned(),
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tplock_api::Error> for CoreError {
    fn from(err: tplock_api::Error) -> Self {
        match err {
            tplock_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            tplock_api::Error::NotAuthenticated => CoreError::NotAuthenticated,
            tplock_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization()),
                        reason: e.to_string(),
                    }
                }
            }
            tplock_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            tplock_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            tplock_api::Error::Api { code } => CoreError::Rejected { code },
            tplock_api::Error::Deserialization { message, body: _ } => {
                CoreError::Protocol { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_maps_to_rejected() {
        let err = CoreError::from(tplock_api::Error::Api { code: -40401 });
        assert!(matches!(err, CoreError::Rejected { code: -40401 }));
        assert!(err.is_network());
    }

    #[test]
    fn api_auth_maps_to_authentication_failed() {
        let err = CoreError::from(tplock_api::Error::Authentication {
            message: "nope".into(),
        });
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert!(!err.is_network());
    }

    #[test]
    fn resolution_errors_are_not_network() {
        let err = CoreError::DeviceNotFound {
            identifier: "mac=aa".into(),
        };
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "Device not found: mac=aa");
    }
}
