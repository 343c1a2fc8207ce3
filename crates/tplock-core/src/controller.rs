// ── Access controller ──
//
// Business-level block/unblock on top of the device registry. The session
// and snapshot are shared by every scheduled job, so the whole registry
// sits behind one async mutex: network calls are serialized and a refresh
// can never interleave with a toggle.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::Mutex;
use tplock_api::{BlockFlagRequest, SessionClient, TransportConfig};
use tracing::{debug, info, warn};

use crate::config::RouterConfig;
use crate::error::CoreError;
use crate::model::{Device, DeviceSelector, DeviceSnapshot, TaskAction};
use crate::registry::DeviceRegistry;

/// Cheaply cloneable handle to the router session and device cache.
#[derive(Clone)]
pub struct AccessController {
    inner: Arc<Mutex<DeviceRegistry>>,
}

impl AccessController {
    pub fn new(registry: DeviceRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Wrap a (not yet logged in) session client.
    pub fn from_client(client: SessionClient) -> Self {
        Self::new(DeviceRegistry::new(client))
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Build a client for `config`, log in, and warm the device cache.
    ///
    /// Login failure is returned. A failed warm-up refresh is only logged:
    /// the session is usable and the cache stays empty until the next
    /// explicit refresh.
    pub async fn connect(config: &RouterConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = SessionClient::new(config.url.clone(), &transport)?;
        let controller = Self::from_client(client);

        controller.login(&config.password).await?;
        info!(router = %config.url, "logged in to router");

        if let Err(e) = controller.refresh().await {
            warn!(error = %e, "initial device fetch failed; cache is empty until the next refresh");
        }

        Ok(controller)
    }

    /// Log in with the raw admin password. Any failure, including a
    /// transport error, is reported as [`CoreError::AuthenticationFailed`].
    pub async fn login(&self, password: &SecretString) -> Result<(), CoreError> {
        let mut registry = self.inner.lock().await;
        registry
            .client_mut()
            .login(password)
            .await
            .map_err(|e| match e {
                tplock_api::Error::Authentication { message } => {
                    CoreError::AuthenticationFailed { message }
                }
                other => CoreError::AuthenticationFailed {
                    message: other.to_string(),
                },
            })
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.lock().await.is_authenticated()
    }

    // ── Device cache ─────────────────────────────────────────────

    /// Fetch the device list, replacing the cache on success.
    pub async fn refresh(&self) -> Result<Arc<DeviceSnapshot>, CoreError> {
        self.inner.lock().await.refresh().await
    }

    /// The cached snapshot, without any I/O.
    pub async fn snapshot(&self) -> Option<Arc<DeviceSnapshot>> {
        self.inner.lock().await.snapshot().cloned()
    }

    /// Refresh, then find the first device whose hostname contains `name`.
    pub async fn find_device(&self, name: &str) -> Option<Device> {
        self.inner.lock().await.find_by_hostname_substring(name).await
    }

    /// Resolve `selector` against the cached snapshot only.
    pub async fn resolve(&self, selector: &DeviceSelector) -> Result<Device, CoreError> {
        let registry = self.inner.lock().await;
        registry.require_session()?;
        resolve_target(&registry, selector).cloned()
    }

    // ── Toggles ──────────────────────────────────────────────────

    /// Block internet access for the device `selector` resolves to.
    pub async fn block(&self, selector: &DeviceSelector) -> Result<bool, CoreError> {
        self.set_blocked(selector, true).await
    }

    /// Restore internet access for the device `selector` resolves to.
    pub async fn unblock(&self, selector: &DeviceSelector) -> Result<bool, CoreError> {
        self.set_blocked(selector, false).await
    }

    /// Dispatch a [`TaskAction`].
    pub async fn apply(
        &self,
        action: TaskAction,
        selector: &DeviceSelector,
    ) -> Result<bool, CoreError> {
        self.set_blocked(selector, action.blocks()).await
    }

    /// Resolve from the cache, then send the toggle with the resolved
    /// device's own MAC and hostname.
    ///
    /// `Ok(true)` when the router accepts, `Ok(false)` when it answers with
    /// a non-zero status. Resolution and transport failures are `Err`.
    async fn set_blocked(&self, selector: &DeviceSelector, blocked: bool) -> Result<bool, CoreError> {
        let registry = self.inner.lock().await;
        registry.require_session()?;

        let device = resolve_target(&registry, selector)?;
        let request = BlockFlagRequest::new(device.mac.as_str(), device.hostname.as_str(), blocked);
        debug!(device = %device.display_name(), blocked, "sending block flag");

        match registry.client().set_block_flag(&request).await {
            Ok(()) => {
                info!(
                    device = %device.display_name(),
                    mac = %device.mac,
                    action = if blocked { "blocked" } else { "unblocked" },
                    "internet access updated"
                );
                Ok(true)
            }
            Err(tplock_api::Error::Api { code }) => {
                warn!(device = %device.display_name(), code, "router rejected block flag");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn resolve_target<'a>(
    registry: &'a DeviceRegistry,
    selector: &DeviceSelector,
) -> Result<&'a Device, CoreError> {
    if selector.is_empty() {
        return Err(CoreError::InvalidSelector);
    }
    registry
        .resolve_for_toggle(selector)
        .ok_or_else(|| CoreError::DeviceNotFound {
            identifier: selector.to_string(),
        })
}
