//! Offline schedule validation.

use chrono::Local;
use tplock_core::ScheduledTask;

use crate::cli::ScheduleArgs;
use crate::error::CliError;
use crate::output;

/// Validate every task and print the valid ones with their next run.
/// Fails with the first invalid task after printing the rest.
pub fn handle(args: &ScheduleArgs) -> Result<(), CliError> {
    let path = args
        .schedule
        .clone()
        .unwrap_or_else(tplock_config::default_schedule_path);
    let schedule = tplock_config::load_schedule(&path)?;

    let now = Local::now();
    let mut valid = Vec::new();
    let mut first_error = None;

    for descriptor in &schedule.tasks {
        if !descriptor.enabled {
            eprintln!("skipped '{}': disabled", descriptor.name);
            continue;
        }
        match ScheduledTask::try_from(descriptor) {
            Ok(task) => {
                let next = task.schedule.next_after(&now);
                valid.push((task, next));
            }
            Err(e) => {
                eprintln!("invalid: {e}");
                first_error.get_or_insert(e);
            }
        }
    }

    output::print_output(&output::render_tasks(&valid));
    first_error.map_or(Ok(()), |e| Err(e.into()))
}
