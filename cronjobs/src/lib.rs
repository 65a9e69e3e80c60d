// Declarative cron-driven database jobs: time-spec parsing, a single
// timer-heap scheduler loop, concurrent execution, and buffered run reporting.

pub mod config;
pub mod errors;
pub mod executor;
pub mod models;
pub mod schedule;
pub mod scheduler;
pub mod sink;
pub mod source;
pub mod telemetry;
