// Core data model: jobs, schedule entries, and run results

use crate::errors::ExecutionError;
use crate::executor::JobAction;
use crate::schedule::Spec;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A registered job: a unique name, a parsed time spec, and the action to
/// run on each firing. Immutable after registration.
pub struct Job {
    pub name: String,
    pub spec: Spec,
    pub action: Arc<dyn JobAction>,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("spec", &self.spec.expression())
            .finish()
    }
}

/// The outcome of one job firing: produced exactly once by the executor,
/// consumed exactly once by the run consumer
#[derive(Debug)]
pub struct Run {
    pub name: String,
    pub error: Option<ExecutionError>,
    pub duration: Duration,
}

impl Run {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A schedule entry pairing a job with its next fire time.
/// Invariant: `next_fire` is always strictly in the future relative to the
/// instant it was computed from.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub next_fire: DateTime<Utc>,
    pub job: Arc<Job>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.next_fire == other.next_fire && self.job.name == other.job.name
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // BinaryHeap is a max-heap; the comparison is reversed so the soonest
    // fire time surfaces first. Ties break by name for determinism.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .next_fire
            .cmp(&self.next_fire)
            .then_with(|| other.job.name.cmp(&self.job.name))
    }
}
