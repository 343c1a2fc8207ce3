// ── Wire → domain conversion ──
//
// Host records arrive as loosely-shaped JSON; they are flattened into
// `Device` immediately after a successful fetch.

use std::net::IpAddr;

use tplock_api::{HostEntry, HostsResponse};

use crate::model::{Device, DeviceSnapshot, MacAddress};

impl From<HostEntry> for Device {
    fn from(h: HostEntry) -> Self {
        Self {
            mac: MacAddress::new(h.mac),
            ip: h.ip.as_deref().and_then(|ip| ip.trim().parse::<IpAddr>().ok()),
            hostname: h.hostname,
            blocked: h.blocked,
        }
    }
}

impl From<HostsResponse> for DeviceSnapshot {
    fn from(resp: HostsResponse) -> Self {
        DeviceSnapshot::new(resp.into_hosts().into_iter().map(Device::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn host_entry_converts_to_device() {
        let entry: HostEntry = serde_json::from_value(json!({
            "mac": "AA-BB-CC-DD-EE-FF",
            "hostname": "tv",
            "ip": "192.168.0.42",
            "blocked": "1"
        }))
        .unwrap();

        let device = Device::from(entry);
        assert_eq!(device.mac.as_str(), "AA-BB-CC-DD-EE-FF");
        assert_eq!(device.ip, Some("192.168.0.42".parse().unwrap()));
        assert!(device.blocked);
    }

    #[test]
    fn unparseable_ip_becomes_none() {
        let entry: HostEntry = serde_json::from_value(json!({ "mac": "x", "ip": "N/A" })).unwrap();
        assert_eq!(Device::from(entry).ip, None);
    }

    #[test]
    fn response_flattens_into_snapshot_in_order() {
        let resp: HostsResponse = serde_json::from_value(json!({
            "error_code": 0,
            "hosts_info": { "host_info": [
                { "host_info_0": { "mac": "01", "hostname": "a" } },
                { "host_info_1": { "mac": "02", "hostname": "b" } }
            ]}
        }))
        .unwrap();

        let snap = DeviceSnapshot::from(resp);
        let names: Vec<&str> = snap.iter().map(|d| d.hostname.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
