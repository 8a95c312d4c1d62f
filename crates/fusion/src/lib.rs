//! # Fusion
//!
//! Latest-per-source state plus the inverse-variance position estimate, and
//! the reducer process loop that feeds it from the sensor-channel.

mod engine;
mod reducer;

pub use engine::FusionEngine;
pub use reducer::{run_reducer, ReducerConfig};
