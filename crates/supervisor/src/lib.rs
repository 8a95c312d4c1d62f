//! # Supervisor
//!
//! Owns the lifecycle of every simulated process: deterministic placement,
//! spawning, liveness polling, sensor restart, bus-activity idle detection
//! and the two-phase shutdown cascade.
//!
//! The [`Supervisor`] exclusively owns its collection of [`AgentHandle`]s;
//! all lifecycle transitions are methods on this owner. No other component
//! controls process lifecycle.

mod handle;
mod monitor;
mod placement;
mod supervisor;

pub use handle::{AgentHandle, AgentState, ManagedRole, RespawnSpec};
pub use monitor::{run_activity_monitor, ActivityClock};
pub use placement::{circle_placement, PathPlan};
pub use supervisor::{RunStats, Supervisor};
