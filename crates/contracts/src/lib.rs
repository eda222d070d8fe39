//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend only on this crate, never on each other's internals.
//!
//! ## Time Model
//! - Sample timestamps are seconds since the start of the driver's lap (f64)
//! - The shared timeline always starts at 0 and is lap-relative for every driver
//! - Frame index `i` denotes the same instant for every tracked driver

mod blueprint;
mod driver_id;
mod error;
mod provider;
mod synced;
mod telemetry;
mod timeline_config;

pub use blueprint::*;
pub use driver_id::DriverId;
pub use error::*;
pub use provider::SessionDataProvider;
pub use synced::*;
pub use telemetry::*;
pub use timeline_config::*;
