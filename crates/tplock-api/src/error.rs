use thiserror::Error;

/// Top-level error type for the `tplock-api` crate.
///
/// Covers every failure mode of the router's management API:
/// login, transport, envelope status, and body decoding.
/// `tplock-core` maps these into domain diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected by the router, or the login request itself failed.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An authenticated call was attempted before a successful login.
    #[error("No session -- login required")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Router API ──────────────────────────────────────────────────
    /// The router answered with a non-zero `error_code`.
    #[error("Router rejected request (error_code {code})")]
    Api { code: i64 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the router (or the lack of a token) suggests the
    /// session is gone and a fresh login might resolve it.
    ///
    /// The router publishes no error-code enumeration, so any non-zero
    /// status on an authenticated call counts.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::NotAuthenticated | Self::Api { .. }
        )
    }

    /// Returns `true` for timeouts and connection failures.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// The router's `error_code`, if this error carries one.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::Api { code } => Some(*code),
            _ => None,
        }
    }
}
