// ── Device domain types ──
//
// Flat, strongly-typed mirror of the router's host table. Nothing here is
// authoritative: the router owns the state, a snapshot is just the last
// successful read of it.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address exactly as the router reported it (usually `AA-BB-CC-DD-EE-FF`).
///
/// The router expects its own spelling back in toggle requests, so the
/// text is kept verbatim; comparison is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive exact comparison.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// The canonical Device type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub mac: MacAddress,
    pub hostname: String,
    pub ip: Option<IpAddr>,
    pub blocked: bool,
}

impl Device {
    /// Hostname if the router knows one, otherwise the MAC.
    pub fn display_name(&self) -> &str {
        if self.hostname.is_empty() {
            self.mac.as_str()
        } else {
            &self.hostname
        }
    }
}

// ── DeviceSelector ──────────────────────────────────────────────────

/// How a caller identifies a device: MAC, hostname substring, or both.
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSelector {
    pub mac: Option<String>,
    pub name: Option<String>,
}

impl DeviceSelector {
    pub fn new(mac: Option<String>, name: Option<String>) -> Self {
        Self {
            mac: mac.filter(|m| !m.is_empty()),
            name: name.filter(|n| !n.is_empty()),
        }
    }

    pub fn by_mac(mac: impl Into<String>) -> Self {
        Self::new(Some(mac.into()), None)
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self::new(None, Some(name.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.mac.is_none() && self.name.is_none()
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.mac, &self.name) {
            (Some(mac), Some(name)) => write!(f, "mac={mac}, name={name}"),
            (Some(mac), None) => write!(f, "mac={mac}"),
            (None, Some(name)) => write!(f, "name={name}"),
            (None, None) => f.write_str("<empty>"),
        }
    }
}

// ── DeviceSnapshot ──────────────────────────────────────────────────

/// The complete device list from one successful fetch, in router order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSnapshot {
    pub devices: Arc<[Device]>,
    pub fetched_at: DateTime<Utc>,
}

impl DeviceSnapshot {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices: devices.into(),
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// First device whose MAC equals `mac`, ignoring case.
    pub fn find_by_mac(&self, mac: &str) -> Option<&Device> {
        self.iter().find(|d| d.mac.matches(mac))
    }

    /// First device whose hostname contains `name` (case-sensitive).
    pub fn find_by_hostname(&self, name: &str) -> Option<&Device> {
        self.iter().find(|d| d.hostname.contains(name))
    }

    /// Resolve a selector: any MAC match beats any hostname match,
    /// regardless of position in the list.
    pub fn resolve(&self, selector: &DeviceSelector) -> Option<&Device> {
        selector
            .mac
            .as_deref()
            .and_then(|mac| self.find_by_mac(mac))
            .or_else(|| {
                selector
                    .name
                    .as_deref()
                    .and_then(|name| self.find_by_hostname(name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn device(mac: &str, hostname: &str) -> Device {
        Device {
            mac: MacAddress::new(mac),
            hostname: hostname.into(),
            ip: None,
            blocked: false,
        }
    }

    fn snapshot() -> DeviceSnapshot {
        DeviceSnapshot::new(vec![
            device("AA-AA-AA-AA-AA-01", "android-eee46d2d0988b09e"),
            device("AA-AA-AA-AA-AA-02", "kids-tablet"),
            device("AA-AA-AA-AA-AA-03", "kids-laptop"),
        ])
    }

    #[test]
    fn mac_match_ignores_case() {
        let snap = snapshot();
        let found = snap.resolve(&DeviceSelector::by_mac("aa-aa-aa-aa-aa-02"));
        assert_eq!(found.map(|d| d.hostname.as_str()), Some("kids-tablet"));
    }

    #[test]
    fn mac_must_match_exactly() {
        let snap = snapshot();
        assert!(snap.resolve(&DeviceSelector::by_mac("AA-AA-AA-AA-AA")).is_none());
    }

    #[test]
    fn hostname_is_case_sensitive_substring() {
        let snap = snapshot();
        let found = snap.resolve(&DeviceSelector::by_name("eee46d"));
        assert_eq!(found.map(|d| d.mac.as_str()), Some("AA-AA-AA-AA-AA-01"));
        assert!(snap.resolve(&DeviceSelector::by_name("EEE46D")).is_none());
    }

    #[test]
    fn first_hostname_match_wins() {
        let snap = snapshot();
        let found = snap.resolve(&DeviceSelector::by_name("kids"));
        assert_eq!(found.map(|d| d.hostname.as_str()), Some("kids-tablet"));
    }

    #[test]
    fn mac_match_wins_over_earlier_hostname_match() {
        let snap = snapshot();
        // "kids" matches entry 2 by hostname; the MAC points at entry 3.
        let selector = DeviceSelector::new(Some("aa-aa-aa-aa-aa-03".into()), Some("kids".into()));
        let found = snap.resolve(&selector);
        assert_eq!(found.map(|d| d.hostname.as_str()), Some("kids-laptop"));
    }

    #[test]
    fn falls_back_to_hostname_when_mac_misses() {
        let snap = snapshot();
        let selector = DeviceSelector::new(Some("FF-FF-FF-FF-FF-FF".into()), Some("tablet".into()));
        let found = snap.resolve(&selector);
        assert_eq!(found.map(|d| d.hostname.as_str()), Some("kids-tablet"));
    }

    #[test]
    fn empty_snapshot_and_empty_selector_resolve_nothing() {
        let empty = DeviceSnapshot::new(Vec::new());
        assert!(empty.resolve(&DeviceSelector::by_name("kids")).is_none());
        assert!(snapshot().resolve(&DeviceSelector::default()).is_none());
    }

    #[test]
    fn selector_treats_empty_strings_as_absent() {
        let selector = DeviceSelector::new(Some(String::new()), Some(String::new()));
        assert!(selector.is_empty());
        assert_eq!(selector.to_string(), "<empty>");
        assert_eq!(
            DeviceSelector::new(Some("m".into()), Some("n".into())).to_string(),
            "mac=m, name=n"
        );
    }

    #[test]
    fn display_name_falls_back_to_mac() {
        assert_eq!(device("AA", "").display_name(), "AA");
        assert_eq!(device("AA", "tv").display_name(), "tv");
    }
}
