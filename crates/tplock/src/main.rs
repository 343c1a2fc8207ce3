mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// File name of the daemon's log inside the log directory.
const DAEMON_LOG: &str = "daemon.log";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let guard = match init_tracing(&cli) {
        Ok(guard) => guard,
        Err(err) => exit_with(err),
    };

    tracing::debug!(command = ?cli.command, "dispatching command");
    let result = commands::dispatch(cli.command, &cli.global).await;

    // Flush the log file before a possible process::exit.
    drop(guard);

    if let Err(err) = result {
        exit_with(err);
    }
}

fn exit_with(err: CliError) -> ! {
    let code = err.exit_code();
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(code);
}

/// Logs go to stderr. The daemon also appends to `daemon.log` unless
/// `--no-log-file` is given, and defaults to `info` instead of `warn`.
fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>, CliError> {
    let daemon = match &cli.command {
        Command::Daemon(args) => Some(args),
        _ => None,
    };

    let level = match (cli.global.verbose, daemon.is_some()) {
        (0, false) => "warn",
        (0, true) | (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file = match daemon {
        Some(args) if !args.no_log_file => {
            let dir = args.log_dir.clone().unwrap_or_else(tplock_config::log_dir);
            std::fs::create_dir_all(&dir)?;

            let appender = tracing_appender::rolling::never(&dir, DAEMON_LOG);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            Some((layer, guard))
        }
        _ => None,
    };
    let (file_layer, guard) = file.unzip();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}
