//! One-off block / unblock.

use owo_colors::OwoColorize;
use tplock_core::{AccessController, DeviceSelector};

use crate::cli::{GlobalOpts, OutputFormat, TargetArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    controller: &AccessController,
    args: TargetArgs,
    blocked: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selector = util::selector(args.mac, args.name)?;
    let message = apply(controller, &selector, blocked, output::should_color(global.color)).await?;
    if global.output != OutputFormat::Plain {
        output::print_output(&message);
    }
    Ok(())
}

/// Resolve against the cached device list, send the toggle, and describe
/// what happened. A router rejection is an error.
pub async fn apply(
    controller: &AccessController,
    selector: &DeviceSelector,
    blocked: bool,
    color: bool,
) -> Result<String, CliError> {
    let device = controller.resolve(selector).await?;
    let applied = if blocked {
        controller.block(selector).await?
    } else {
        controller.unblock(selector).await?
    };

    if !applied {
        return Err(CliError::NotApplied {
            device: device.display_name().to_owned(),
        });
    }

    let verb = if blocked { "Blocked" } else { "Unblocked" };
    let name = if color {
        device.display_name().bold().to_string()
    } else {
        device.display_name().to_owned()
    };
    Ok(format!("{verb} {name} ({})", device.mac))
}
