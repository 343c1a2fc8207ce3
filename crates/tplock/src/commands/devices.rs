//! Device listing and lookup.

use tplock_core::AccessController;

use crate::cli::{FindArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Fetch a fresh device list and print it.
pub async fn list(controller: &AccessController, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = controller.refresh().await?;
    let color = output::should_color(global.color);
    output::print_output(&output::render_devices(global.output, &snapshot, color)?);
    Ok(())
}

/// Refresh, then print the first device whose hostname contains the name.
pub async fn find(
    controller: &AccessController,
    args: &FindArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = controller
        .find_device(&args.name)
        .await
        .ok_or_else(|| CliError::NotFound {
            identifier: format!("name={}", args.name),
        })?;

    let color = output::should_color(global.color);
    output::print_output(&output::render_device(global.output, &device, color)?);
    Ok(())
}
