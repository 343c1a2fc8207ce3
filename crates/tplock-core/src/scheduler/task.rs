// ── Scheduled task types ──

use std::fmt;

use crate::error::CoreError;
use crate::model::{DeviceSelector, TaskAction, TaskDescriptor};

use super::cron::CronSchedule;

/// A validated task, ready to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub name: String,
    pub selector: DeviceSelector,
    pub action: TaskAction,
    pub schedule: CronSchedule,
}

impl TryFrom<&TaskDescriptor> for ScheduledTask {
    type Error = CoreError;

    /// Checks run in a fixed order (decoding, name, action, device, cron)
    /// so the first problem found is the one reported. `enabled` is not
    /// looked at here; the scheduler skips disabled descriptors first.
    fn try_from(d: &TaskDescriptor) -> Result<Self, Self::Error> {
        let name = d.name.trim();
        if let Some(reason) = &d.malformed {
            let label = if name.is_empty() { "<unnamed>" } else { name };
            return Err(CoreError::task_config(label, format!("malformed entry: {reason}")));
        }
        if name.is_empty() {
            return Err(CoreError::task_config("<unnamed>", "task name is required"));
        }

        let action: TaskAction = d.action.trim().parse().map_err(|_| {
            CoreError::task_config(
                name,
                format!("unknown action '{}' (expected block or unblock)", d.action),
            )
        })?;

        let selector = DeviceSelector::new(
            Some(d.device_mac.trim().to_owned()),
            Some(d.device_name.trim().to_owned()),
        );
        if selector.is_empty() {
            return Err(CoreError::task_config(
                name,
                "device_mac or device_name is required",
            ));
        }

        if d.cron.trim().is_empty() {
            return Err(CoreError::task_config(name, "cron expression is required"));
        }
        let schedule = CronSchedule::parse(&d.cron)
            .map_err(|e| CoreError::task_config(name, format!("invalid cron '{}': {e}", d.cron)))?;

        Ok(Self {
            name: name.to_owned(),
            selector,
            action,
            schedule,
        })
    }
}

impl fmt::Display for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {} at '{}')",
            self.name, self.action, self.selector, self.schedule
        )
    }
}

/// What [`TaskScheduler::register`](super::TaskScheduler::register) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    /// A task with the same name existed and was replaced.
    Replaced,
    /// Descriptor had `enabled: false`; nothing was registered.
    Disabled,
}

/// A descriptor that was not registered, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTask {
    pub name: String,
    pub reason: String,
}

/// Result of registering a whole schedule file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Number of distinct tasks now scheduled.
    pub registered: usize,
    pub skipped: Vec<SkippedTask>,
}

/// How one execution of a task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The router accepted the toggle.
    Succeeded,
    /// The router answered with a non-zero status.
    Rejected,
    /// The device could not be resolved, or the request never completed.
    Failed(String),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}
