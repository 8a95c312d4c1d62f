//! # Contracts
//!
//! Frozen interface contracts, defining inter-crate data structures.
//! All business crates may depend on this crate only; reverse dependencies
//! are prohibited.
//!
//! ## Time model
//! - Object progress `t` is normalized 0..1 along the target's path.
//! - Wall-clock decisions (debounce, rotation, idle detection) are local to
//!   each process; nothing on the wire carries a wall-clock timestamp.

mod blueprint;
mod channel;
mod codec;
mod error;
mod report;

pub use blueprint::*;
pub use channel::*;
pub use codec::Record;
pub use error::*;
pub use report::*;
