//! Command dispatch.

mod daemon;
mod devices;
mod menu;
mod schedule;
mod toggle;
mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        // Offline: only reads the schedule file
        Command::Schedule(args) => schedule::handle(&args),

        // The daemon logs in itself so its lifecycle covers the login step
        Command::Daemon(args) => daemon::handle(&args, global).await,

        Command::Devices => devices::list(&util::connect(global).await?, global).await,
        Command::Find(args) => devices::find(&util::connect(global).await?, &args, global).await,
        Command::Block(args) => {
            toggle::handle(&util::connect(global).await?, args, true, global).await
        }
        Command::Unblock(args) => {
            toggle::handle(&util::connect(global).await?, args, false, global).await
        }
        Command::Menu => menu::run(&util::connect(global).await?, global).await,
    }
}
