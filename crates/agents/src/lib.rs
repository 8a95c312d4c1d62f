//! # Agents
//!
//! The bus producers: the target emitter and the three sensor agent
//! variants. Each variant is a pure decision core (unit-testable without
//! sockets or clocks) plus a run loop wiring the core to a bus subscriber,
//! a publisher and a cooperative stop signal.
//!
//! All sensor agents subscribe to the object-channel and act only on
//! `Record::Object`; sensor-tagged traffic on a shared channel is ignored
//! to avoid feedback loops.

mod adas;
mod emitter;
mod noisy;
mod tacan;

pub use adas::{run_adas, AdasConfig, DebounceGate};
pub use emitter::{lerp, run_emitter, EmitterConfig};
pub use noisy::{run_noisy, NoisyConfig};
pub use tacan::{angular_difference, bearing_deg, run_tacan, RotationGate, TacanConfig};
