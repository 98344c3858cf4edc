//! Response Cache - ephemeral TTL cache in front of an AI learning assistant
//!
//! Serves recently computed hints, reviews and explanations until their
//! time-to-live lapses, and recomputes them through the assistant backend
//! on a miss.

pub mod api;
pub mod assistant;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, SharedCache};
pub use config::Config;
pub use tasks::spawn_sweep_task;
