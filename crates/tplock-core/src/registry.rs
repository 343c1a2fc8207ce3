// ── Device registry ──
//
// Owns the router session and the last successful device snapshot.
// The snapshot is replaced wholesale on every successful fetch and left
// alone on failure: stale-but-available beats empty.

use std::sync::Arc;

use tplock_api::SessionClient;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Device, DeviceSelector, DeviceSnapshot};

/// Session client plus cached device list.
pub struct DeviceRegistry {
    client: SessionClient,
    snapshot: Option<Arc<DeviceSnapshot>>,
}

impl DeviceRegistry {
    pub fn new(client: SessionClient) -> Self {
        Self {
            client,
            snapshot: None,
        }
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut SessionClient {
        &mut self.client
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    pub(crate) fn require_session(&self) -> Result<(), CoreError> {
        if self.client.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    /// The cached snapshot. Never touches the network.
    pub fn snapshot(&self) -> Option<&Arc<DeviceSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Fetch the device list and replace the cached snapshot.
    ///
    /// On failure the previous snapshot is kept as-is and the error is
    /// returned; callers must not read a failure as "no devices".
    pub async fn refresh(&mut self) -> Result<Arc<DeviceSnapshot>, CoreError> {
        self.require_session()?;

        match self.client.query_hosts().await {
            Ok(resp) => {
                let snapshot = Arc::new(DeviceSnapshot::from(resp));
                info!(device_count = snapshot.len(), "device list refreshed");
                self.snapshot = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    cached = self.snapshot.as_ref().map_or(0, |s| s.len()),
                    "device refresh failed, keeping cached snapshot"
                );
                Err(e.into())
            }
        }
    }

    /// Refresh, then return the first device whose hostname contains `name`.
    ///
    /// Returns `None` when this refresh fails, even if an older snapshot
    /// would have matched.
    pub async fn find_by_hostname_substring(&mut self, name: &str) -> Option<Device> {
        let snapshot = self.refresh().await.ok()?;
        let found = snapshot.find_by_hostname(name).cloned();
        if found.is_none() {
            debug!(name, "no device hostname contains name");
        }
        found
    }

    /// Resolve a toggle target from the cached snapshot only.
    pub fn resolve_for_toggle(&self, selector: &DeviceSelector) -> Option<&Device> {
        if selector.is_empty() {
            return None;
        }
        self.snapshot.as_deref()?.resolve(selector)
    }

    #[cfg(test)]
    pub(crate) fn set_snapshot(&mut self, snapshot: DeviceSnapshot) {
        self.snapshot = Some(Arc::new(snapshot));
    }
}
