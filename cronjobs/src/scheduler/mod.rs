// Scheduler module: job registry, timer loop, and lifecycle

pub mod engine;

pub use engine::{Scheduler, SchedulerConfig, SchedulerHandle};
