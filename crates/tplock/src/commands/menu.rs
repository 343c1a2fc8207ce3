//! Interactive menu.

use dialoguer::{Input, Select};
use tplock_core::{AccessController, DeviceSelector};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::toggle;

const ITEMS: [&str; 4] = [
    "List devices",
    "Block a device",
    "Unblock a device",
    "Quit",
];

/// Loop until the user picks Quit. Failed actions are reported and the
/// menu continues; only a prompt failure (e.g. no TTY) ends it early.
pub async fn run(controller: &AccessController, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    loop {
        let choice = Select::new()
            .with_prompt("Choose an action")
            .items(&ITEMS)
            .default(0)
            .interact()?;

        let result = match choice {
            0 => list(controller, color).await,
            1 => toggle_prompt(controller, true, color).await,
            2 => toggle_prompt(controller, false, color).await,
            _ => return Ok(()),
        };

        if let Err(e) = result {
            eprintln!("{:?}", miette::Report::new(e));
        }
    }
}

async fn list(controller: &AccessController, color: bool) -> Result<(), CliError> {
    let snapshot = controller.refresh().await?;
    output::print_output(&output::render_devices(OutputFormat::Table, &snapshot, color)?);
    Ok(())
}

async fn toggle_prompt(
    controller: &AccessController,
    blocked: bool,
    color: bool,
) -> Result<(), CliError> {
    let Some(selector) = prompt_selector()? else {
        eprintln!("A MAC address or a device name is required.");
        return Ok(());
    };
    let message = toggle::apply(controller, &selector, blocked, color).await?;
    output::print_output(&message);
    Ok(())
}

fn prompt_selector() -> Result<Option<DeviceSelector>, CliError> {
    let mac: String = Input::new()
        .with_prompt("Device MAC (optional, e.g. AA-BB-CC-DD-EE-FF)")
        .allow_empty(true)
        .interact_text()?;
    let name: String = Input::new()
        .with_prompt("Device name (optional)")
        .allow_empty(true)
        .interact_text()?;

    let selector = DeviceSelector::new(Some(mac.trim().to_owned()), Some(name.trim().to_owned()));
    Ok((!selector.is_empty()).then_some(selector))
}
