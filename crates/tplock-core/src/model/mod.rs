// ── Domain model ──

pub mod device;
pub mod task;

pub use device::{Device, DeviceSelector, DeviceSnapshot, MacAddress};
pub use task::{TaskAction, TaskDescriptor};
