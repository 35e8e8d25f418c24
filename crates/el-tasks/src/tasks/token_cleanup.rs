//! Token Cleanup Task
//!
//! Hard-deletes refresh tokens past their expiry. Tokens are already dead
//! credentials at that point; no retention window applies.

use async_trait::async_trait;
use chrono::Utc;
use el_config::TasksConfig;
use el_platform::PgRefreshTokenStore;
use std::sync::Arc;
use tracing::info;

use crate::execution_log::TaskExecutionLog;
use crate::{Task, TaskError};

pub struct TokenCleanupTask {
    store: Arc<PgRefreshTokenStore>,
    enabled: bool,
}

impl TokenCleanupTask {
    pub const NAME: &'static str = "token_cleanup";

    pub fn new(store: Arc<PgRefreshTokenStore>, config: &TasksConfig) -> Self {
        Self {
            store,
            enabled: config.is_enabled(Self::NAME),
        }
    }
}

#[async_trait]
impl Task for TokenCleanupTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn run(&self, log: &TaskExecutionLog) -> Result<bool, TaskError> {
        let removed = self.store.delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(run_id = log.id, removed, "expired refresh tokens removed");
        }
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enablement_from_config() {
        let mut config = TasksConfig::default();
        assert!(!config.is_enabled(TokenCleanupTask::NAME));

        config
            .enabled
            .insert(TokenCleanupTask::NAME.to_string(), true);
        assert!(config.is_enabled(TokenCleanupTask::NAME));
    }
}
