// Error types for spec parsing, registration, execution, and file discovery

use std::path::PathBuf;
use thiserror::Error;

/// Time-spec parsing and evaluation errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("No next occurrence for cron expression '{expression}'")]
    NoNextOccurrence { expression: String },
}

/// Job registration errors; each affects only the job being registered
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Invalid time spec: {0}")]
    InvalidSpec(#[from] ScheduleError),

    #[error("Duplicate job name: {0}")]
    DuplicateName(String),
}

/// Job execution errors, captured as data in a `Run` rather than propagated
/// to the scheduler loop
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Job action failed: {0}")]
    ActionFailed(String),
}

/// Job-file discovery errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },

    #[error("File {}: cron spec (\"[...]cron: [spec]\") was not found", .path.display())]
    MissingSpec { path: PathBuf },

    #[error("File {}: {source}", .path.display())]
    Registration {
        path: PathBuf,
        #[source]
        source: RegistrationError,
    },
}
