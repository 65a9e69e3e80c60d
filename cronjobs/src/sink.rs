// Run result sink: the consumer contract and the drain task that sits on
// the other side of the bounded run channel

use crate::models::Run;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

/// Consumes run results in completion order. Installed before the scheduler
/// starts and runs for its whole lifetime; one result is delivered exactly
/// once.
#[async_trait]
pub trait RunConsumer: Send + Sync {
    async fn consume(&self, run: Run);
}

/// Default consumer: one log line per run result
pub struct LogConsumer;

#[async_trait]
impl RunConsumer for LogConsumer {
    async fn consume(&self, run: Run) {
        let duration_ms = run.duration.as_millis() as u64;
        match &run.error {
            None => info!(job = %run.name, duration_ms, "OK"),
            Some(e) => error!(job = %run.name, duration_ms, error = %e, "job failed"),
        }
    }
}

/// A consumer that retains every run it sees, for tests and for callers
/// that post-process outcomes in bulk
pub struct CollectingConsumer {
    runs: Arc<Mutex<Vec<Run>>>,
}

impl CollectingConsumer {
    pub fn new() -> Self {
        Self {
            runs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the collected runs
    pub fn runs(&self) -> Arc<Mutex<Vec<Run>>> {
        self.runs.clone()
    }
}

impl Default for CollectingConsumer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunConsumer for CollectingConsumer {
    async fn consume(&self, run: Run) {
        self.runs.lock().await.push(run);
    }
}

/// Drain the channel until it is both closed and empty, then exit
pub(crate) async fn drain(mut runs: mpsc::Receiver<Run>, consumer: Arc<dyn RunConsumer>) {
    while let Some(run) = runs.recv().await {
        consumer.consume(run).await;
    }
}
