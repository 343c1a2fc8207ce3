//! Shared helpers for command handlers.

use std::path::PathBuf;

use tplock_core::{AccessController, DeviceSelector, RouterConfig};
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// `--config`, or the platform default location.
pub fn connection_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(tplock_config::default_connection_path)
}

/// Load config.json and apply CLI overrides.
pub fn router_config(global: &GlobalOpts) -> Result<RouterConfig, CliError> {
    let path = connection_path(global);
    debug!(path = %path.display(), "loading connection config");
    let connection = tplock_config::load_connection(&path)?;
    Ok(connection.to_router_config(global.timeout)?)
}

/// Log in and warm the device cache.
pub async fn connect(global: &GlobalOpts) -> Result<AccessController, CliError> {
    let router = router_config(global)?;
    Ok(AccessController::connect(&router).await?)
}

/// Build a selector, rejecting one with neither MAC nor name.
pub fn selector(mac: Option<String>, name: Option<String>) -> Result<DeviceSelector, CliError> {
    let selector = DeviceSelector::new(
        mac.map(|m| m.trim().to_owned()),
        name.map(|n| n.trim().to_owned()),
    );
    if selector.is_empty() {
        return Err(CliError::Validation {
            field: "device".into(),
            reason: "pass --mac, --name, or both".into(),
        });
    }
    Ok(selector)
}
