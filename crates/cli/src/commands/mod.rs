//! Command implementations.

mod emit;
mod fuse;
mod info;
mod run;
mod sensor;
mod validate;

pub use emit::run_emit;
pub use fuse::run_fuse;
pub use info::run_info;
pub use run::run_simulation;
pub use sensor::run_sensor;
pub use validate::run_validate;
