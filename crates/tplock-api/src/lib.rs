// tplock-api: Async Rust client for the TP-Link router `stok`/`ds` management API

pub mod error;
pub mod models;
pub mod obfuscate;
pub mod session;
pub mod transport;

pub use error::Error;
pub use models::{BlockFlagRequest, HostEntry, HostsResponse};
pub use session::SessionClient;
pub use transport::TransportConfig;
