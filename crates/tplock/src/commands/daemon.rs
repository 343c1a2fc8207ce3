//! Long-running scheduler.

use tplock_core::{CoreError, Daemon};
use tracing::{info, warn};

use crate::cli::{DaemonArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(args: &DaemonArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let connection_path = util::connection_path(global);
    let schedule_path = args
        .schedule
        .clone()
        .unwrap_or_else(tplock_config::default_schedule_path);
    info!(
        config = %connection_path.display(),
        schedule = %schedule_path.display(),
        "starting daemon"
    );

    let daemon = Daemon::new();
    let report = daemon
        .run(
            || {
                tplock_config::load_daemon_config(&connection_path, &schedule_path, global.timeout)
                    .map_err(|e| CoreError::Config {
                        message: e.to_string(),
                    })
            },
            shutdown_signal(),
        )
        .await?;

    if report.registered == 0 {
        warn!("schedule contained no runnable tasks");
    }
    info!(
        registered = report.registered,
        skipped = report.skipped.len(),
        "daemon exited cleanly"
    );
    Ok(())
}

/// Resolve on SIGINT or SIGTERM (Ctrl-C elsewhere).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => info!("SIGINT received"),
                    _ = sigterm.recv() => info!("SIGTERM received"),
                }
            }
            _ => {
                warn!("could not install signal handlers, waiting for Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl-C received");
    }
}
