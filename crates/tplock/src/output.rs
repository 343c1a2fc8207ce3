//! Output formatting: table, JSON, plain.
//!
//! Table uses `tabled`, JSON uses serde, plain emits one MAC per line.
//! Blocked/allowed status is coloured with `owo-colors` when enabled.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use tplock_core::{Device, DeviceSnapshot, ScheduledTask};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub fn status_label(blocked: bool, color: bool) -> String {
    match (blocked, color) {
        (true, true) => "blocked".red().bold().to_string(),
        (false, true) => "allowed".green().to_string(),
        (true, false) => "blocked".into(),
        (false, false) => "allowed".into(),
    }
}

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl DeviceRow {
    fn new(index: usize, d: &Device, color: bool) -> Self {
        Self {
            index,
            mac: d.mac.to_string(),
            ip: d.ip.map(|ip| ip.to_string()).unwrap_or_default(),
            hostname: d.hostname.clone(),
            status: status_label(d.blocked, color),
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Task")]
    name: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Cron")]
    cron: String,
    #[tabled(rename = "Next run")]
    next: String,
}

// ── Renderers ────────────────────────────────────────────────────────

/// Render a device list in the chosen format.
pub fn render_devices(
    format: OutputFormat,
    snapshot: &DeviceSnapshot,
    color: bool,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => {
            if snapshot.is_empty() {
                return Ok("No devices reported by the router.".into());
            }
            let rows: Vec<DeviceRow> = snapshot
                .iter()
                .enumerate()
                .map(|(i, d)| DeviceRow::new(i + 1, d, color))
                .collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(&*snapshot.devices)?,
        OutputFormat::Plain => snapshot
            .iter()
            .map(|d| d.mac.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Render a single device in the chosen format.
pub fn render_device(format: OutputFormat, device: &Device, color: bool) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => [
            format!("Hostname: {}", device.display_name()),
            format!("MAC:      {}", device.mac),
            format!(
                "IP:       {}",
                device.ip.map_or_else(|| "-".into(), |ip| ip.to_string())
            ),
            format!("Status:   {}", status_label(device.blocked, color)),
        ]
        .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(device)?,
        OutputFormat::Plain => device.mac.to_string(),
    })
}

/// Render validated tasks with their next fire time.
pub fn render_tasks(tasks: &[(ScheduledTask, Option<DateTime<Local>>)]) -> String {
    if tasks.is_empty() {
        return "No tasks scheduled.".into();
    }
    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|(t, next)| TaskRow {
            name: t.name.clone(),
            action: t.action.to_string(),
            device: t.selector.to_string(),
            cron: t.schedule.to_string(),
            next: next.map_or_else(|| "never".into(), |n| n.format("%Y-%m-%d %H:%M").to_string()),
        })
        .collect();
    render_table(&rows)
}

/// Print the rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tplock_core::MacAddress;

    fn snapshot() -> DeviceSnapshot {
        DeviceSnapshot::new(vec![
            Device {
                mac: MacAddress::new("AA-BB-CC-DD-EE-01"),
                hostname: "kids-tablet".into(),
                ip: "192.168.1.20".parse().ok(),
                blocked: true,
            },
            Device {
                mac: MacAddress::new("AA-BB-CC-DD-EE-02"),
                hostname: String::new(),
                ip: None,
                blocked: false,
            },
        ])
    }

    #[test]
    fn table_lists_every_device() {
        let out = render_devices(OutputFormat::Table, &snapshot(), false).unwrap();
        assert!(out.contains("kids-tablet"));
        assert!(out.contains("192.168.1.20"));
        assert!(out.contains("blocked"));
        assert!(out.contains("allowed"));
    }

    #[test]
    fn plain_is_one_mac_per_line() {
        let out = render_devices(OutputFormat::Plain, &snapshot(), false).unwrap();
        assert_eq!(out, "AA-BB-CC-DD-EE-01\nAA-BB-CC-DD-EE-02");
    }

    #[test]
    fn json_is_an_array() {
        let out = render_devices(OutputFormat::Json, &snapshot(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["mac"], "AA-BB-CC-DD-EE-01");
    }

    #[test]
    fn empty_snapshot_has_a_message() {
        let out = render_devices(OutputFormat::Table, &DeviceSnapshot::new(Vec::new()), false).unwrap();
        assert!(out.contains("No devices"));
    }

    #[test]
    fn uncoloured_labels_are_plain_text() {
        assert_eq!(status_label(true, false), "blocked");
        assert!(status_label(true, true).contains("\u{1b}["));
    }
}
