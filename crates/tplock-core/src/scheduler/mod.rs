// ── Task scheduler ──
//
// One job loop per registered task. Each loop computes the next fire time
// in local time, sleeps toward it in bounded chunks, then executes the task
// on its own tokio task so a failure or panic stays contained. All loops
// share one `AccessController`, whose mutex serializes the router calls.

mod cron;
mod task;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::controller::AccessController;
use crate::error::CoreError;
use crate::model::TaskDescriptor;

pub use self::cron::CronSchedule;
pub use self::task::{Registration, RegistrationReport, ScheduledTask, SkippedTask, TaskOutcome};

/// Upper bound on a single sleep, so wall-clock jumps (suspend, DST, NTP
/// steps) are noticed within a minute.
const MAX_SLEEP: Duration = Duration::from_secs(60);

/// Registered tasks keyed by name, in registration order.
pub struct TaskScheduler {
    controller: AccessController,
    tasks: IndexMap<String, Arc<ScheduledTask>>,
}

impl TaskScheduler {
    pub fn new(controller: AccessController) -> Self {
        Self {
            controller,
            tasks: IndexMap::new(),
        }
    }

    // ── Registration ─────────────────────────────────────────────

    /// Validate and register one descriptor.
    ///
    /// Disabled descriptors are accepted and ignored. A name already in use
    /// is replaced, keeping its original position.
    pub fn register(&mut self, descriptor: &TaskDescriptor) -> Result<Registration, CoreError> {
        if !descriptor.enabled {
            info!(task = %descriptor.name, "task disabled, not scheduling");
            return Ok(Registration::Disabled);
        }

        let task = ScheduledTask::try_from(descriptor)?;
        let name = task.name.clone();
        let summary = task.to_string();

        match self.tasks.insert(name.clone(), Arc::new(task)) {
            Some(_) => {
                warn!(task = %name, "task name registered twice, replacing earlier definition");
                Ok(Registration::Replaced)
            }
            None => {
                info!(task = %summary, "task scheduled");
                Ok(Registration::Added)
            }
        }
    }

    /// Register every descriptor, collecting the ones that were skipped.
    pub fn register_all<'a, I>(&mut self, descriptors: I) -> RegistrationReport
    where
        I: IntoIterator<Item = &'a TaskDescriptor>,
    {
        let mut skipped = Vec::new();

        for descriptor in descriptors {
            match self.register(descriptor) {
                Ok(Registration::Added | Registration::Replaced) => {}
                Ok(Registration::Disabled) => skipped.push(SkippedTask {
                    name: descriptor.name.clone(),
                    reason: "disabled".into(),
                }),
                Err(e) => {
                    error!(error = %e, "skipping invalid task");
                    let reason = match e {
                        CoreError::TaskConfig { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    skipped.push(SkippedTask {
                        name: descriptor.name.clone(),
                        reason,
                    });
                }
            }
        }

        let report = RegistrationReport {
            registered: self.tasks.len(),
            skipped,
        };
        info!(
            registered = report.registered,
            skipped = report.skipped.len(),
            "schedule loaded"
        );
        report
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.values().map(Arc::as_ref)
    }

    pub fn get(&self, name: &str) -> Option<&ScheduledTask> {
        self.tasks.get(name).map(Arc::as_ref)
    }

    pub fn controller(&self) -> &AccessController {
        &self.controller
    }

    /// Next fire time of every registered task, in local time.
    pub fn next_runs(&self) -> Vec<(String, Option<DateTime<Local>>)> {
        let now = Local::now();
        self.tasks
            .values()
            .map(|t| (t.name.clone(), t.schedule.next_after(&now)))
            .collect()
    }

    // ── Execution ────────────────────────────────────────────────

    /// Run one task immediately. Never fails; the outcome is logged.
    pub async fn execute(&self, task: &ScheduledTask) -> TaskOutcome {
        execute_task(&self.controller, task).await
    }

    /// Spawn one job loop per task and return a handle to stop them.
    pub fn start(&self) -> RunningScheduler {
        let cancel = CancellationToken::new();
        let handles = self
            .tasks
            .values()
            .map(|task| {
                let fires = CronFires::new(task.schedule.clone());
                let run = runner(self.controller.clone(), Arc::clone(task));
                tokio::spawn(job_loop(Arc::clone(task), fires, run, cancel.clone()))
            })
            .collect();

        info!(jobs = self.tasks.len(), "scheduler started");
        RunningScheduler { cancel, handles }
    }

    /// Run until `shutdown` completes, then stop and join every job loop.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let running = self.start();
        shutdown.await;
        info!("shutdown requested, stopping scheduler");
        running.stop().await;
    }
}

/// Handle to the job loops spawned by [`TaskScheduler::start`].
pub struct RunningScheduler {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl RunningScheduler {
    pub fn job_count(&self) -> usize {
        self.handles.len()
    }

    /// Stop dispatching new executions, let in-flight ones finish, and
    /// join every loop.
    pub async fn stop(self) {
        self.cancel.cancel();
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "job loop ended abnormally");
            }
        }
        info!("scheduler stopped");
    }
}

// ── Job loop ─────────────────────────────────────────────────────────

/// Execute `task` once through `controller`, mapping the result to a
/// [`TaskOutcome`] and logging it.
pub async fn execute_task(controller: &AccessController, task: &ScheduledTask) -> TaskOutcome {
    info!(task = %task.name, action = %task.action, device = %task.selector, "running task");

    match controller.apply(task.action, &task.selector).await {
        Ok(true) => {
            info!(task = %task.name, "task succeeded");
            TaskOutcome::Succeeded
        }
        Ok(false) => {
            warn!(task = %task.name, "task rejected by router");
            TaskOutcome::Rejected
        }
        Err(e) => {
            error!(task = %task.name, error = %e, "task failed");
            TaskOutcome::Failed(e.to_string())
        }
    }
}

/// Fire times of a cron schedule in local time.
///
/// Each time is computed from the later of now and the previous fire
/// time, so a wall clock stepping backwards never repeats a run.
struct CronFires {
    schedule: CronSchedule,
    last: Option<DateTime<Local>>,
}

impl CronFires {
    fn new(schedule: CronSchedule) -> Self {
        Self {
            schedule,
            last: None,
        }
    }
}

impl Iterator for CronFires {
    type Item = DateTime<Local>;

    fn next(&mut self) -> Option<Self::Item> {
        let now = Local::now();
        let base = match self.last {
            Some(fired) if fired > now => fired,
            _ => now,
        };
        let next = self.schedule.next_after(&base)?;
        self.last = Some(next);
        Some(next)
    }
}

type Execution = Pin<Box<dyn Future<Output = TaskOutcome> + Send>>;

/// Build the closure a job loop calls at each fire time.
fn runner(controller: AccessController, task: Arc<ScheduledTask>) -> impl FnMut() -> Execution + Send {
    move || {
        let controller = controller.clone();
        let task = Arc::clone(&task);
        Box::pin(async move { execute_task(&controller, &task).await })
    }
}

/// Sleep to each fire time in turn and run the task there. Every run is
/// its own tokio task, so an error or panic ends that run only.
async fn job_loop<I, R, F>(task: Arc<ScheduledTask>, mut fires: I, mut run: R, cancel: CancellationToken)
where
    I: Iterator<Item = DateTime<Local>>,
    R: FnMut() -> F,
    F: Future<Output = TaskOutcome> + Send + 'static,
{
    loop {
        let Some(next) = fires.next() else {
            warn!(task = %task.name, cron = %task.schedule, "no further fire times, job loop ending");
            return;
        };
        debug!(task = %task.name, next = %next, "next run");

        if !sleep_until(next, &cancel).await {
            debug!(task = %task.name, "job loop cancelled");
            return;
        }

        // Awaited outside any select so shutdown lets it finish.
        if let Err(e) = tokio::spawn(run()).await {
            error!(task = %task.name, error = %e, "task execution panicked");
        }
    }
}

/// Sleep until the wall clock reaches `deadline`. Returns `false` if
/// cancelled first.
async fn sleep_until(deadline: DateTime<Local>, cancel: &CancellationToken) -> bool {
    loop {
        let Ok(remaining) = (deadline - Local::now()).to_std() else {
            return true;
        };
        if remaining.is_zero() {
            return true;
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => return false,
            () = tokio::time::sleep(remaining.min(MAX_SLEEP)) => {}
        }
    }
}
