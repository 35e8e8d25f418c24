//! Task Execution Log
//!
//! One row per task invocation: inserted when execution starts, completed
//! exactly once with the outcome. Rows are immutable afterwards.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::TaskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
    Skipped,
}

impl TaskOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskOutcome::Success => "SUCCESS",
            TaskOutcome::Failed => "FAILED",
            TaskOutcome::Skipped => "SKIPPED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(TaskOutcome::Success),
            "FAILED" => Some(TaskOutcome::Failed),
            "SKIPPED" => Some(TaskOutcome::Skipped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskExecutionLog {
    pub id: i64,
    pub task_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcome: Option<TaskOutcome>,
    pub error_message: Option<String>,
}

pub struct PgTaskLogStore {
    pool: PgPool,
}

impl PgTaskLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the execution log table if it does not exist.
    pub async fn init_schema(&self) -> Result<(), TaskError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS task_execution_logs (
                id BIGSERIAL PRIMARY KEY,
                task_name TEXT NOT NULL,
                started_at TIMESTAMPTZ NOT NULL,
                finished_at TIMESTAMPTZ,
                outcome TEXT,
                error_message TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_task_logs_name_started \
             ON task_execution_logs(task_name, started_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record the start of an execution.
    pub async fn insert_started(&self, task_name: &str) -> Result<TaskExecutionLog, TaskError> {
        let started_at = Utc::now();
        let row = sqlx::query(
            "INSERT INTO task_execution_logs (task_name, started_at) \
             VALUES ($1, $2) RETURNING id",
        )
        .bind(task_name)
        .bind(started_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(TaskExecutionLog {
            id: row.get("id"),
            task_name: task_name.to_string(),
            started_at,
            finished_at: None,
            outcome: None,
            error_message: None,
        })
    }

    /// Complete an execution with its outcome.
    pub async fn complete(
        &self,
        id: i64,
        outcome: TaskOutcome,
        error_message: Option<&str>,
    ) -> Result<(), TaskError> {
        sqlx::query(
            "UPDATE task_execution_logs SET finished_at = $1, outcome = $2, error_message = $3 \
             WHERE id = $4 AND finished_at IS NULL",
        )
        .bind(Utc::now())
        .bind(outcome.as_str())
        .bind(error_message)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent executions, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<TaskExecutionLog>, TaskError> {
        let rows = sqlx::query(
            "SELECT id, task_name, started_at, finished_at, outcome, error_message \
             FROM task_execution_logs ORDER BY started_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let outcome: Option<String> = row.get("outcome");
                TaskExecutionLog {
                    id: row.get("id"),
                    task_name: row.get("task_name"),
                    started_at: row.get("started_at"),
                    finished_at: row.get("finished_at"),
                    outcome: outcome.as_deref().and_then(TaskOutcome::parse),
                    error_message: row.get("error_message"),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_roundtrip() {
        for outcome in [TaskOutcome::Success, TaskOutcome::Failed, TaskOutcome::Skipped] {
            assert_eq!(TaskOutcome::parse(outcome.as_str()), Some(outcome));
        }
        assert_eq!(TaskOutcome::parse("bogus"), None);
    }
}
