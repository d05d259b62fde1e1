//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a cache.
//!
//! # Tasks
//! - TTL Sweep: Removes expired entries from a memory store at a fixed interval

mod sweep;

pub use sweep::spawn_sweep_task;
