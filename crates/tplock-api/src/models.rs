// Router API wire types
//
// Every response carries a top-level `error_code` (0 == success). Host
// records are nested as a list of single-key objects
// (`[{"host_info_0": {...}}, ...]`), so they are decoded into an ordered
// map per entry and flattened by `HostsResponse::hosts`. Fields use
// `#[serde(default)]` liberally because firmware versions disagree about
// which keys are present.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

// ── Envelope ─────────────────────────────────────────────────────────

/// Login response: `{"error_code":0,"stok":"..."}`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub error_code: i64,
    #[serde(default)]
    pub stok: Option<String>,
}

// ── Host query ───────────────────────────────────────────────────────

/// Body of the composite device query: host table, router interface
/// MAC, and the extended connection table.
pub fn hosts_query() -> Value {
    json!({
        "hosts_info": { "table": "host_info", "name": "cap_host_num" },
        "network": { "name": "iface_mac" },
        "hyfi": { "table": ["connected_ext"] },
        "method": "get"
    })
}

/// Response to [`hosts_query`].
#[derive(Debug, Default, Deserialize)]
pub struct HostsResponse {
    #[serde(default)]
    pub hosts_info: HostsInfo,
    /// Router interface info. Not interpreted.
    #[serde(default)]
    pub network: Option<Value>,
    /// Extended connection table. Not interpreted.
    #[serde(default)]
    pub hyfi: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HostsInfo {
    #[serde(default)]
    pub host_info: Vec<IndexMap<String, HostEntry>>,
}

impl HostsResponse {
    /// All host records, in the order the router listed them.
    pub fn hosts(&self) -> impl Iterator<Item = &HostEntry> {
        self.hosts_info.host_info.iter().flat_map(IndexMap::values)
    }

    /// Consume the response, yielding host records in router order.
    pub fn into_hosts(self) -> Vec<HostEntry> {
        self.hosts_info
            .host_info
            .into_iter()
            .flat_map(IndexMap::into_values)
            .collect()
    }
}

/// A single host record from `hosts_info.host_info`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostEntry {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub ip: Option<String>,
    /// `"1"` when internet access is blocked.
    #[serde(default, deserialize_with = "flag")]
    pub blocked: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Accept `"1"`/`"0"`, numbers, booleans, and null for a boolean flag.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => s.trim() == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

// ── Block flag ───────────────────────────────────────────────────────

/// Payload of `hosts_info.set_block_flag`.
///
/// The router overwrites the device's bandwidth limits, forbidden
/// domains, and time limits with whatever this carries, so every toggle
/// resets them to "unlimited".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockFlagRequest {
    pub mac: String,
    pub is_blocked: String,
    pub name: String,
    pub down_limit: String,
    pub up_limit: String,
    pub forbid_domain: String,
    pub limit_time: String,
}

impl BlockFlagRequest {
    pub fn new(mac: impl Into<String>, name: impl Into<String>, blocked: bool) -> Self {
        Self {
            mac: mac.into(),
            is_blocked: if blocked { "1" } else { "0" }.to_owned(),
            name: name.into(),
            down_limit: "0".to_owned(),
            up_limit: "0".to_owned(),
            forbid_domain: String::new(),
            limit_time: String::new(),
        }
    }

    /// Full request body.
    pub fn to_body(&self) -> Value {
        json!({
            "hosts_info": { "set_block_flag": self },
            "method": "do"
        })
    }
}
