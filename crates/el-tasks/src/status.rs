//! Task Status Tracking
//!
//! Process-wide `task name → is running` map. Concurrent scheduler ticks and
//! API reads share it, so it lives in a concurrent map rather than a plain
//! dictionary.

use dashmap::DashMap;

#[derive(Default)]
pub struct TaskStatusService {
    states: DashMap<String, bool>,
}

impl TaskStatusService {
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
        }
    }

    /// Register a task's initial state. Only the first write for a name
    /// takes effect; re-registration is a no-op.
    pub fn set_initial_state(&self, name: &str, is_running: bool) {
        self.states.entry(name.to_string()).or_insert(is_running);
    }

    /// Unconditionally overwrite a task's running state. Used to flip state
    /// at the start and end of an execution.
    pub fn set_running(&self, name: &str, is_running: bool) {
        self.states.insert(name.to_string(), is_running);
    }

    /// Whether the named task is currently running. Unknown names are not
    /// running.
    pub fn is_running(&self, name: &str) -> bool {
        self.states.get(name).map(|v| *v).unwrap_or(false)
    }

    /// Snapshot of all registered task states.
    pub fn snapshot(&self) -> Vec<(String, bool)> {
        self.states
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_first_write_wins() {
        let service = TaskStatusService::new();
        service.set_initial_state("x", true);
        service.set_initial_state("x", false);
        assert!(service.is_running("x"));
    }

    #[test]
    fn test_set_running_overwrites() {
        let service = TaskStatusService::new();
        service.set_initial_state("x", false);
        service.set_running("x", true);
        assert!(service.is_running("x"));
        service.set_running("x", false);
        assert!(!service.is_running("x"));
    }

    #[test]
    fn test_unknown_task_not_running() {
        let service = TaskStatusService::new();
        assert!(!service.is_running("never-registered"));
    }

    #[test]
    fn test_snapshot_lists_registered_tasks() {
        let service = TaskStatusService::new();
        service.set_initial_state("a", false);
        service.set_initial_state("b", true);
        let mut snapshot = service.snapshot();
        snapshot.sort();
        assert_eq!(
            snapshot,
            vec![("a".to_string(), false), ("b".to_string(), true)]
        );
    }
}
