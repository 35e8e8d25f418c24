//! Task Runner
//!
//! Interval loop driving the registered tasks. Each tick tries the shared
//! advisory lock; when another instance holds it, the tick is skipped
//! entirely. A task's state machine per invocation is
//! `Idle → Running → Idle`, flipped through [`TaskStatusService`], with one
//! execution-log row recording the outcome.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::execution_log::{PgTaskLogStore, TaskOutcome};
use crate::lock::PgLockService;
use crate::status::TaskStatusService;
use crate::{Task, TaskError};

#[derive(Debug, Clone)]
pub struct TaskRunnerConfig {
    /// Tick interval between scheduling passes
    pub poll_interval: Duration,

    /// Advisory lock name shared by all instances
    pub lock_key: String,
}

impl Default for TaskRunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            lock_key: "el:task-runner".to_string(),
        }
    }
}

pub struct TaskRunner {
    config: TaskRunnerConfig,
    lock: PgLockService,
    status: Arc<TaskStatusService>,
    logs: PgTaskLogStore,
    tasks: Vec<Arc<dyn Task>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl TaskRunner {
    pub fn new(
        config: TaskRunnerConfig,
        lock: PgLockService,
        status: Arc<TaskStatusService>,
        logs: PgTaskLogStore,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            lock,
            status,
            logs,
            tasks: Vec::new(),
            shutdown_tx,
        }
    }

    /// Register a task. Its initial state is idle; registration is
    /// idempotent with respect to the status map.
    pub fn register(&mut self, task: Arc<dyn Task>) {
        self.status.set_initial_state(task.name(), false);
        info!(task = task.name(), enabled = task.enabled(), "task registered");
        self.tasks.push(task);
    }

    pub fn status(&self) -> Arc<TaskStatusService> {
        self.status.clone()
    }

    /// Start the scheduling loop on the runtime.
    pub async fn start(self: Arc<Self>) {
        let runner = self.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            lock = %self.config.lock_key,
            tasks = self.tasks.len(),
            "task runner starting"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(runner.config.poll_interval);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        runner.tick().await;
                    }
                    _ = shutdown_rx.recv() => {
                        info!("task runner shutting down");
                        break;
                    }
                }
            }
        });
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// One scheduling pass: acquire the shared lock, run every runnable
    /// task, release.
    async fn tick(&self) {
        let guard = match self.lock.try_lock(&self.config.lock_key).await {
            Ok(Some(guard)) => guard,
            Ok(None) => {
                debug!(lock = %self.config.lock_key, "task lock held by another instance, skipping tick");
                metrics::counter!("tasks_ticks_skipped_total").increment(1);
                return;
            }
            Err(e) => {
                error!(error = %e, "failed to acquire task lock");
                return;
            }
        };

        self.run_due_tasks().await;

        if let Err(e) = guard.release().await {
            warn!(error = %e, "failed to release task lock");
        }
    }

    async fn run_due_tasks(&self) {
        for task in &self.tasks {
            let name = task.name();

            if !task.enabled() {
                debug!(task = name, "task disabled, not executing");
                continue;
            }

            if self.status.is_running(name) {
                warn!(task = name, "previous run still in progress, skipping");
                continue;
            }

            self.status.set_running(name, true);
            self.execute_task(task.as_ref()).await;
            self.status.set_running(name, false);
        }
    }

    /// Execute one task behind the never-fails boundary: any error is
    /// logged and recorded, never propagated to the loop.
    async fn execute_task(&self, task: &dyn Task) {
        let name = task.name();

        let log = match self.logs.insert_started(name).await {
            Ok(log) => log,
            Err(e) => {
                error!(task = name, error = %e, "failed to record task start");
                return;
            }
        };

        let (outcome, error_message) = match task.run(&log).await {
            Ok(true) => (TaskOutcome::Success, None),
            Ok(false) => {
                debug!(task = name, "task had nothing to do");
                (TaskOutcome::Skipped, None)
            }
            Err(TaskError::Disabled(_)) => (TaskOutcome::Skipped, None),
            Err(e) => {
                error!(task = name, error = %e, "task failed");
                (TaskOutcome::Failed, Some(e.to_string()))
            }
        };

        metrics::counter!("tasks_runs_total", "task" => name, "outcome" => outcome.as_str())
            .increment(1);

        if let Err(e) = self
            .logs
            .complete(log.id, outcome, error_message.as_deref())
            .await
        {
            error!(task = name, error = %e, "failed to record task completion");
        }
    }
}
