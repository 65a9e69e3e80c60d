// Job execution: collaborator contracts and the per-firing execution task

use crate::errors::ExecutionError;
use crate::models::{Job, Run};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::warn;

/// A runnable job body. Implementations are shared across firings, so they
/// must be cheap to call repeatedly and must report failure as an error
/// value rather than panicking.
#[async_trait]
pub trait JobAction: Send + Sync {
    /// Run the job once
    async fn run(&self) -> Result<(), ExecutionError>;
}

/// The narrow database collaborator contract: execute one statement and
/// report the outcome. Connection management and transaction semantics
/// belong to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Driver: Send + Sync {
    async fn execute(&self, statement: &str) -> Result<(), ExecutionError>;
}

/// A job action that executes a fixed statement against a database driver,
/// once per firing
pub struct StatementAction {
    driver: Arc<dyn Driver>,
    statement: String,
}

impl StatementAction {
    pub fn new(driver: Arc<dyn Driver>, statement: impl Into<String>) -> Self {
        Self {
            driver,
            statement: statement.into(),
        }
    }
}

#[async_trait]
impl JobAction for StatementAction {
    async fn run(&self) -> Result<(), ExecutionError> {
        self.driver.execute(&self.statement).await
    }
}

/// Body of one execution task: run the action, measure elapsed wall-clock
/// time, and deliver exactly one `Run` into the sink. Blocks on a full sink
/// rather than dropping the result.
pub(crate) async fn execute(job: Arc<Job>, runs: mpsc::Sender<Run>) {
    let started = Instant::now();
    let outcome = job.action.run().await;
    let run = Run {
        name: job.name.clone(),
        error: outcome.err(),
        duration: started.elapsed(),
    };

    // The send fails only if the consumer is gone; stop() rules that out
    // while any execution task still holds a sender clone.
    if runs.send(run).await.is_err() {
        warn!(job = %job.name, "run result dropped: sink closed");
    }
}
