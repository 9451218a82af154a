//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweep: Removes expired render cache entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
