//! Clap derive structures for the `tplock` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tplock -- internet access control for TP-Link routers
#[derive(Debug, Parser)]
#[command(
    name = "tplock",
    version,
    about = "Block and unblock devices on a TP-Link router",
    long_about = "Block and unblock devices on a TP-Link router.\n\n\
        Run one-off toggles from the command line or the interactive menu,\n\
        or start the daemon to apply a cron schedule.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to config.json (router address and password)
    #[arg(long, short = 'c', env = "TPLOCK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (overrides config.json)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one MAC per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every device the router knows about
    #[command(alias = "ls")]
    Devices,

    /// Find the first device whose hostname contains NAME
    Find(FindArgs),

    /// Block a device's internet access
    Block(TargetArgs),

    /// Restore a device's internet access
    Unblock(TargetArgs),

    /// Interactive menu (list / block / unblock)
    Menu,

    /// Validate a schedule file and show each task's next run
    Schedule(ScheduleArgs),

    /// Run the cron scheduler until SIGINT or SIGTERM
    Daemon(DaemonArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Hostname substring (case-sensitive)
    pub name: String,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Device MAC address, e.g. AA-BB-CC-DD-EE-FF (case-insensitive)
    #[arg(long, short = 'm')]
    pub mac: Option<String>,

    /// Hostname substring; used when --mac is absent or matches nothing
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// Path to schedule_config.json
    pub schedule: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DaemonArgs {
    /// Path to schedule_config.json
    pub schedule: Option<PathBuf>,

    /// Directory for daemon.log
    #[arg(long, env = "TPLOCK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log to stderr only
    #[arg(long)]
    pub no_log_file: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
