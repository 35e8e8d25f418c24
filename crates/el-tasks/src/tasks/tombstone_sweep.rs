//! Tombstone Sweep Task
//!
//! Second phase of the two-phase delete: hard-deletes every tombstoned row
//! whose retention window has elapsed.

use async_trait::async_trait;
use el_config::TasksConfig;
use el_platform::CascadeDeleteService;
use std::sync::Arc;
use tracing::info;

use crate::execution_log::TaskExecutionLog;
use crate::{Task, TaskError};

pub struct TombstoneSweepTask {
    cascade: Arc<CascadeDeleteService>,
    enabled: bool,
}

impl TombstoneSweepTask {
    pub const NAME: &'static str = "tombstone_sweep";

    pub fn new(cascade: Arc<CascadeDeleteService>, config: &TasksConfig) -> Self {
        Self {
            cascade,
            enabled: config.is_enabled(Self::NAME),
        }
    }
}

#[async_trait]
impl Task for TombstoneSweepTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn run(&self, log: &TaskExecutionLog) -> Result<bool, TaskError> {
        let purged = self.cascade.purge_expired().await?;
        if purged > 0 {
            info!(run_id = log.id, purged, "expired tombstones purged");
        }
        Ok(purged > 0)
    }
}
