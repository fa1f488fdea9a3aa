// Configuration: container manager programs, timeouts, readiness polling.

mod loader;
mod types;

pub use loader::{CONFIG_FILE, load};
pub use types::{Config, ManagerConfig, ProbeConfig};
