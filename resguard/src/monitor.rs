//! Resource lifecycle monitoring
//!
//! Every [`ManagedResource`](crate::ManagedResource) reports its acquisition
//! and release here, together with any release failure that was swallowed
//! at scope exit. The monitor is the record of those failures that the
//! dropped resource itself can no longer return.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use serde::Serialize;

use crate::errors::ErrorChain;
use crate::types::ResourceName;

/// Tracks open resources and swallowed release failures.
#[derive(Debug, Default)]
pub struct LifecycleMonitor {
    state: Mutex<MonitorState>,
}

#[derive(Debug, Default)]
struct MonitorState {
    open: HashMap<ResourceName, usize>,
    opened: u64,
    released: u64,
    swallowed: Vec<SwallowedFailure>,
}

/// A release failure that was reported through the diagnostic sink instead
/// of being returned to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwallowedFailure {
    /// The resource whose release failed
    pub resource: ResourceName,
    /// The failure message
    pub message: String,
}

/// Snapshot of the monitor counters
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleStats {
    /// Resources currently open
    pub open: usize,
    /// Resources opened since the monitor was created
    pub opened: u64,
    /// Resources released since the monitor was created
    pub released: u64,
    /// Release failures swallowed at scope exit
    pub swallowed_failures: usize,
}

impl LifecycleMonitor {
    /// Create a new monitor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource acquisition
    pub fn register_acquisition(&self, name: &ResourceName) {
        if let Ok(mut state) = self.state.lock() {
            *state.open.entry(name.clone()).or_insert(0) += 1;
            state.opened += 1;
        }
    }

    /// Register a resource release
    pub fn register_release(&self, name: &ResourceName) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(count) = state.open.get_mut(name) {
                *count -= 1;
                if *count == 0 {
                    state.open.remove(name);
                }
            }
            state.released += 1;
        }
    }

    /// Record a release failure swallowed at scope exit
    pub fn register_swallowed_failure(&self, name: &ResourceName, error: &ErrorChain) {
        if let Ok(mut state) = self.state.lock() {
            state.swallowed.push(SwallowedFailure {
                resource: name.clone(),
                message: error.to_string(),
            });
        }
    }

    /// Number of currently open resources with the given name
    pub fn open_count(&self, name: &str) -> usize {
        self.state
            .lock()
            .ok()
            .and_then(|state| {
                state
                    .open
                    .iter()
                    .find(|(open, _)| open.as_ref() == name)
                    .map(|(_, count)| *count)
            })
            .unwrap_or(0)
    }

    /// All swallowed failures, oldest first
    pub fn swallowed_failures(&self) -> Vec<SwallowedFailure> {
        self.state
            .lock()
            .map_or_else(|_| Vec::new(), |state| state.swallowed.clone())
    }

    /// Swallowed failures for one resource name, oldest first
    pub fn swallowed_failures_for(&self, name: &str) -> Vec<SwallowedFailure> {
        self.state.lock().map_or_else(
            |_| Vec::new(),
            |state| {
                state
                    .swallowed
                    .iter()
                    .filter(|failure| failure.resource.as_ref() == name)
                    .cloned()
                    .collect()
            },
        )
    }

    /// Get statistics about resource usage
    pub fn stats(&self) -> LifecycleStats {
        self.state.lock().map_or_else(
            |_| LifecycleStats::default(),
            |state| LifecycleStats {
                open: state.open.values().sum(),
                opened: state.opened,
                released: state.released,
                swallowed_failures: state.swallowed.len(),
            },
        )
    }
}

/// Global lifecycle monitor instance
static GLOBAL_MONITOR: OnceLock<LifecycleMonitor> = OnceLock::new();

/// Get the global lifecycle monitor
pub fn global_monitor() -> &'static LifecycleMonitor {
    GLOBAL_MONITOR.get_or_init(LifecycleMonitor::new)
}
