//! Device resolution, access control, and scheduling between `tplock-api`
//! and the `tplock` binary.
//!
//! - **[`AccessController`]** — Cloneable facade that owns the router
//!   session and the cached device list behind one async mutex, so every
//!   network-touching operation is serialized. [`connect()`](AccessController::connect)
//!   logs in and warms the cache; [`block()`](AccessController::block) and
//!   [`unblock()`](AccessController::unblock) toggle a device's internet access.
//!
//! - **[`DeviceRegistry`]** — The last successful device snapshot plus
//!   name/MAC resolution. A failed refresh never clears the cache.
//!
//! - **[`TaskScheduler`]** — Validates task descriptors, keys them by name,
//!   and runs one cron-driven job loop per task. A failing job is logged and
//!   never takes down the loop or its siblings.
//!
//! - **[`Daemon`]** — The startup/shutdown state machine tying the above
//!   together for the long-running process.

pub mod config;
pub mod controller;
pub mod convert;
pub mod daemon;
pub mod error;
pub mod model;
pub mod registry;
pub mod scheduler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DaemonConfig, RouterConfig};
pub use controller::AccessController;
pub use daemon::{Daemon, SchedulerState};
pub use error::CoreError;
pub use registry::DeviceRegistry;
pub use scheduler::{
    CronSchedule, Registration, RegistrationReport, RunningScheduler, ScheduledTask,
    SkippedTask, TaskOutcome, TaskScheduler,
};

pub use model::{Device, DeviceSelector, DeviceSnapshot, MacAddress, TaskAction, TaskDescriptor};
