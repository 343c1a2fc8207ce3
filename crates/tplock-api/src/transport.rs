// Shared transport configuration for building reqwest::Client instances.
//
// The router speaks plain HTTP on the LAN, so there is no TLS knob here:
// only the per-request timeout and the cookie jar that carries transport
// state between login and the authenticated calls.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

/// Default per-request timeout. The router's web UI is slow but local;
/// anything beyond a few seconds is treated as a failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Config with the given timeout and no cookie jar yet.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            cookie_jar: None,
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("tplock/", env!("CARGO_PKG_VERSION")));

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder.build().map_err(crate::error::Error::Transport)
    }

    /// Create a config with a fresh cookie jar (for session auth).
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }
}
