// ── Daemon lifecycle ──
//
// Startup and shutdown sequence for the long-running scheduler process.
// Progress is published on a watch channel so the binary (and tests) can
// observe where a run stopped.

use std::future::Future;

use strum::Display;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::DaemonConfig;
use crate::controller::AccessController;
use crate::error::CoreError;
use crate::scheduler::{RegistrationReport, TaskScheduler};

/// Where the daemon is in its lifecycle. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SchedulerState {
    Init,
    ConfigLoaded,
    SessionReady,
    TasksRegistered,
    Running,
    Stopping,
    Stopped,
}

pub struct Daemon {
    state: watch::Sender<SchedulerState>,
}

impl Default for Daemon {
    fn default() -> Self {
        Self::new()
    }
}

impl Daemon {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SchedulerState::Init);
        Self { state }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    fn advance(&self, next: SchedulerState) {
        self.state.send_replace(next);
        info!(state = %next, "daemon state");
    }

    /// Load config, log in, register tasks, and run until `shutdown`.
    ///
    /// A config or login failure is returned before anything is
    /// scheduled. Invalid tasks are skipped and listed in the returned
    /// report; an empty schedule still runs until shutdown.
    pub async fn run<L, F>(&self, load: L, shutdown: F) -> Result<RegistrationReport, CoreError>
    where
        L: FnOnce() -> Result<DaemonConfig, CoreError>,
        F: Future<Output = ()>,
    {
        let config = load().inspect_err(|e| error!(error = %e, "failed to load configuration"))?;
        self.advance(SchedulerState::ConfigLoaded);

        let controller = AccessController::connect(&config.router)
            .await
            .inspect_err(|e| error!(error = %e, "router login failed"))?;
        self.advance(SchedulerState::SessionReady);

        let mut scheduler = TaskScheduler::new(controller);
        let report = scheduler.register_all(&config.tasks);
        for skipped in &report.skipped {
            info!(task = %skipped.name, reason = %skipped.reason, "task not scheduled");
        }
        self.advance(SchedulerState::TasksRegistered);

        for (name, next) in scheduler.next_runs() {
            if let Some(next) = next {
                info!(task = %name, next = %next, "first run");
            }
        }

        let running = scheduler.start();
        self.advance(SchedulerState::Running);

        shutdown.await;
        self.advance(SchedulerState::Stopping);
        running.stop().await;
        self.advance(SchedulerState::Stopped);

        Ok(report)
    }
}
