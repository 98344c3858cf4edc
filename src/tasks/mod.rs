//! Background Tasks Module
//!
//! # Tasks
//! - Sweep: frees expired cache entries at the configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
