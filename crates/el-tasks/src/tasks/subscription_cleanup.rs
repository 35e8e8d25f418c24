//! Expired Subscription Cleanup Task
//!
//! Flips lapsed Active subscriptions to Expired and tombstones them with the
//! configured retention window; the sweep removes them once it elapses.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use el_config::TasksConfig;
use el_platform::PgSubscriptionStore;
use std::sync::Arc;
use tracing::info;

use crate::execution_log::TaskExecutionLog;
use crate::{Task, TaskError};

pub struct SubscriptionCleanupTask {
    store: Arc<PgSubscriptionStore>,
    retention: Duration,
    enabled: bool,
}

impl SubscriptionCleanupTask {
    pub const NAME: &'static str = "subscription_cleanup";

    pub fn new(store: Arc<PgSubscriptionStore>, config: &TasksConfig) -> Self {
        Self {
            store,
            retention: Duration::days(config.retention_days),
            enabled: config.is_enabled(Self::NAME),
        }
    }
}

#[async_trait]
impl Task for SubscriptionCleanupTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn run(&self, log: &TaskExecutionLog) -> Result<bool, TaskError> {
        let expired = self.store.expire_lapsed(Utc::now(), self.retention).await?;
        if expired > 0 {
            info!(run_id = log.id, expired, "lapsed subscriptions expired");
        }
        Ok(expired > 0)
    }
}
