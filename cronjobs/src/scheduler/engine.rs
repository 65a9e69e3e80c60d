// Scheduler engine: registry, single timer-heap loop, and graceful lifecycle

use crate::errors::{RegistrationError, ScheduleError};
use crate::executor::{self, JobAction};
use crate::models::{Entry, Job, Run};
use crate::schedule::Spec;
use crate::sink::{self, LogConsumer, RunConsumer};
use chrono::Utc;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Configuration for a scheduler instance
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Capacity of the run result channel; producers block when it is full
    pub channel_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 128,
        }
    }
}

/// A scheduler instance: a job registry plus the timer loop and run consumer
/// that drive it once started. Instances are independent; several can
/// coexist in one process.
pub struct Scheduler {
    config: SchedulerConfig,
    entries: BinaryHeap<Entry>,
    names: HashSet<String>,
    consumer: Arc<dyn RunConsumer>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            entries: BinaryHeap::new(),
            names: HashSet::new(),
            consumer: Arc::new(LogConsumer),
        }
    }

    /// Replace the default log consumer. Takes effect at start.
    pub fn with_consumer(mut self, consumer: Arc<dyn RunConsumer>) -> Self {
        self.consumer = consumer;
        self
    }

    /// Register a job under a unique name. The first fire time is computed
    /// relative to now; nothing fires until `start`. A failed registration
    /// leaves previously registered jobs untouched.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        spec_text: &str,
        action: Arc<dyn JobAction>,
    ) -> Result<(), RegistrationError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(RegistrationError::DuplicateName(name));
        }
        let spec = Spec::parse(spec_text)?;

        // A spec with no future occurrence would register a job that can
        // never fire; reject it up front.
        let next_fire =
            spec.next_after(Utc::now())
                .ok_or_else(|| ScheduleError::NoNextOccurrence {
                    expression: spec.expression().to_string(),
                })?;

        let job = Arc::new(Job {
            name: name.clone(),
            spec,
            action,
        });
        debug!(job = %name, %next_fire, "job registered");
        self.entries.push(Entry { next_fire, job });
        self.names.insert(name);
        Ok(())
    }

    /// Number of jobs currently scheduled
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start the timer loop and the run consumer. Consuming `self` freezes
    /// the registry: no job can be added to a running scheduler.
    pub fn start(self) -> SchedulerHandle {
        let (run_tx, run_rx) = mpsc::channel(self.config.channel_capacity);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        info!(jobs = self.entries.len(), "starting scheduler");
        let consumer_task = tokio::spawn(sink::drain(run_rx, self.consumer));
        let loop_task = tokio::spawn(run_loop(self.entries, run_tx, shutdown_rx));

        SchedulerHandle {
            shutdown_tx,
            loop_task,
            consumer_task,
        }
    }
}

/// Handle to a running scheduler
pub struct SchedulerHandle {
    shutdown_tx: broadcast::Sender<()>,
    loop_task: JoinHandle<()>,
    consumer_task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Graceful stop: halt the timer loop so nothing new fires, then wait
    /// for the consumer to deliver every buffered and in-flight result.
    ///
    /// Each execution task owns a clone of the run sender, so the channel
    /// closes only after the last in-flight task has delivered its result;
    /// the consumer exits once the channel is closed and empty. No result
    /// is lost and nothing writes to a closed channel.
    pub async fn stop(self) {
        info!("stopping scheduler");
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.loop_task.await {
            warn!(error = %e, "scheduler loop task failed");
        }
        if let Err(e) = self.consumer_task.await {
            warn!(error = %e, "run consumer task failed");
        }
        info!("scheduler stopped");
    }
}

/// The single timer loop: peek the soonest entry, sleep until it is due or
/// shutdown arrives, dispatch due jobs without waiting on them, and
/// reschedule each fired job strictly after the current instant.
async fn run_loop(
    mut entries: BinaryHeap<Entry>,
    run_tx: mpsc::Sender<Run>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        let next_fire = match entries.peek() {
            Some(entry) => entry.next_fire,
            None => {
                // Nothing scheduled; park until shutdown.
                let _ = shutdown_rx.recv().await;
                break;
            }
        };

        let now = Utc::now();
        if next_fire <= now {
            if let Some(entry) = entries.pop() {
                debug!(job = %entry.job.name, due = %entry.next_fire, "dispatching job");
                tokio::spawn(executor::execute(entry.job.clone(), run_tx.clone()));

                // Reschedule from now, not from the missed instant: a loop
                // delayed past a fire time fires once on resume instead of
                // replaying a backlog.
                match entry.job.spec.next_after(now) {
                    Some(next_fire) => entries.push(Entry {
                        next_fire,
                        job: entry.job,
                    }),
                    None => {
                        warn!(job = %entry.job.name, "no further occurrences, retiring job")
                    }
                }
            }
            continue;
        }

        let wait = (next_fire - now).to_std().unwrap_or(Duration::ZERO);
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = shutdown_rx.recv() => {
                debug!("shutdown received, cancelling timer");
                break;
            }
        }
    }
    // run_tx drops here; in-flight execution tasks keep the channel open
    // through their own clones until each has delivered its result.
}
