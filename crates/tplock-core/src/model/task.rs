// ── Task descriptor types ──
//
// `TaskDescriptor` is the loosely-typed shape read from the schedule file.
// Every field is defaulted, and a wrong-typed entry still decodes, so one
// bad task is rejected individually at registration time.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// What a scheduled task does to its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskAction {
    Block,
    Unblock,
}

impl TaskAction {
    /// The block flag this action sets.
    pub fn blocks(self) -> bool {
        matches!(self, Self::Block)
    }
}

/// One entry of the schedule file's `tasks` list.
///
/// Decoding never fails for a single entry: a wrong-typed field or a
/// non-object entry yields a descriptor with `malformed` set, which the
/// scheduler then skips on its own. `null` fields count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDescriptor {
    pub name: String,
    pub device_mac: String,
    pub device_name: String,
    pub action: String,
    pub cron: String,
    pub enabled: bool,
    /// Why the entry could not be decoded.
    #[serde(skip)]
    pub malformed: Option<String>,
}

impl Default for TaskDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            device_mac: String::new(),
            device_name: String::new(),
            action: String::new(),
            cron: String::new(),
            enabled: true,
            malformed: None,
        }
    }
}

impl TaskDescriptor {
    /// Keep whatever identifies the entry so it can still be reported.
    fn malformed(value: &Value, reason: String) -> Self {
        Self {
            name: value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            enabled: value.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            malformed: Some(reason),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    device_mac: String,
    #[serde(default)]
    device_name: String,
    #[serde(default)]
    action: String,
    #[serde(default)]
    cron: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl<'de> Deserialize<'de> for TaskDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Ok(Self::malformed(&value, "task entry must be a JSON object".into()));
        }
        if let Value::Object(map) = &mut value {
            map.retain(|_, v| !v.is_null());
        }

        Ok(match RawDescriptor::deserialize(&value) {
            Ok(raw) => Self {
                name: raw.name,
                device_mac: raw.device_mac,
                device_name: raw.device_name,
                action: raw.action,
                cron: raw.cron,
                enabled: raw.enabled,
                malformed: None,
            },
            Err(e) => Self::malformed(&value, e.to_string()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_parses_lowercase_only() {
        assert_eq!("block".parse::<TaskAction>().unwrap(), TaskAction::Block);
        assert_eq!("unblock".parse::<TaskAction>().unwrap(), TaskAction::Unblock);
        assert!("disable".parse::<TaskAction>().is_err());
        assert!("".parse::<TaskAction>().is_err());
        assert_eq!(TaskAction::Unblock.to_string(), "unblock");
    }

    #[test]
    fn descriptor_defaults_enabled() {
        let d: TaskDescriptor = serde_json::from_value(json!({
            "name": "bedtime",
            "device_mac": "AA-BB-CC-DD-EE-FF",
            "action": "block",
            "cron": "0 22 * * *"
        }))
        .unwrap();
        assert!(d.enabled);
        assert!(d.device_name.is_empty());
    }

    #[test]
    fn descriptor_tolerates_missing_fields() {
        let d: TaskDescriptor = serde_json::from_value(json!({ "enabled": false })).unwrap();
        assert!(!d.enabled);
        assert!(d.name.is_empty());
    }

    #[test]
    fn null_fields_count_as_absent() {
        let d: TaskDescriptor = serde_json::from_value(json!({
            "name": "bedtime",
            "device_mac": null,
            "device_name": "tablet",
            "action": "block",
            "cron": "0 22 * * *"
        }))
        .unwrap();
        assert_eq!(d.malformed, None);
        assert!(d.device_mac.is_empty());
        assert_eq!(d.device_name, "tablet");
    }

    #[test]
    fn wrong_typed_entry_is_marked_malformed() {
        let tasks: Vec<TaskDescriptor> = serde_json::from_value(json!([
            { "name": "bedtime", "device_name": "tablet", "action": "block", "cron": "0 22 * * *" },
            { "name": "typo", "device_name": "tablet", "action": "block", "cron": 5 },
            { "name": "paused", "cron": "0 7 * * *", "enabled": "yes" },
            "not a task"
        ]))
        .unwrap();

        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].malformed, None);
        assert_eq!(tasks[1].name, "typo");
        assert!(tasks[1].malformed.as_deref().unwrap().contains("invalid type"));
        assert!(tasks[2].enabled);
        assert!(tasks[2].malformed.is_some());
        assert!(tasks[3].name.is_empty());
        assert!(tasks[3].malformed.as_deref().unwrap().contains("object"));
    }
}
