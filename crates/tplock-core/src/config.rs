// ── Runtime connection configuration ──
//
// These types describe *how* to reach the router and *what* to schedule.
// They carry credential data but never touch disk. The binary builds them
// from its config files and hands them in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::model::TaskDescriptor;

/// Configuration for talking to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router base URL (e.g., `http://192.168.1.1`).
    pub url: Url,
    /// Raw admin password; obfuscated only at login.
    pub password: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RouterConfig {
    pub fn new(url: Url, password: SecretString) -> Self {
        Self {
            url,
            password,
            timeout: tplock_api::transport::DEFAULT_TIMEOUT,
        }
    }
}

/// Everything the daemon needs once configuration has been loaded.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub router: RouterConfig,
    pub tasks: Vec<TaskDescriptor>,
}
