//! EntreLaunch Background Task Framework
//!
//! Named, configurable maintenance tasks driven by a shared runner:
//! - Each task reads its own enablement from configuration at construction;
//!   a disabled task is skipped, which is an intentional outcome distinct
//!   from failure.
//! - The runner is the never-fails boundary: a task error is logged and
//!   recorded, never allowed to halt the loop.
//! - A Postgres advisory lock ensures only one process instance runs the
//!   scheduled tasks at a time.

use async_trait::async_trait;
use thiserror::Error;

pub mod execution_log;
pub mod lock;
pub mod runner;
pub mod status;
pub mod tasks;

pub use execution_log::{PgTaskLogStore, TaskExecutionLog, TaskOutcome};
pub use lock::{LockGuard, PgLockService};
pub use runner::{TaskRunner, TaskRunnerConfig};
pub use status::TaskStatusService;

#[derive(Error, Debug)]
pub enum TaskError {
    /// The task is intentionally not running; a configuration decision, not
    /// a failure.
    #[error("Task '{0}' is disabled by configuration")]
    Disabled(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Platform error: {0}")]
    Platform(#[from] el_platform::PlatformError),
}

/// A named unit of background work.
///
/// `run` returns `Ok(true)` when work was done, `Ok(false)` for a handled
/// no-op, and `Err` for a real failure. The runner converts errors into
/// logged failure outcomes.
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &'static str;

    /// Enablement resolved from the `tasks.enabled.<name>` configuration key
    /// at construction.
    fn enabled(&self) -> bool;

    async fn run(&self, log: &TaskExecutionLog) -> Result<bool, TaskError>;
}
