/*!
 * Control State
 * State derived from lifecycle events, safe to share with the syscall path
 */

use super::events::LifecycleEvent;
use crate::core::types::ProcId;
use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tracked process entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub ppid: ProcId,
    /// Host process table size when the process was announced
    pub max: u32,
}

/// Registries built from lifecycle events
pub struct ControlState {
    processes: DashMap<ProcId, ProcessRecord, RandomState>,
    modules: RwLock<BTreeSet<i64>>,
    mounts: RwLock<BTreeMap<PathBuf, String>>,
}

impl ControlState {
    pub fn new() -> Self {
        Self {
            processes: DashMap::with_hasher(RandomState::new()),
            modules: RwLock::new(BTreeSet::new()),
            mounts: RwLock::new(BTreeMap::new()),
        }
    }

    /// Fold one event into the registries
    pub fn apply(&self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::ProcessAdd { id, ppid, max } => {
                self.processes.insert(*id, ProcessRecord { ppid: *ppid, max: *max });
                debug!(id, ppid, "process tracked");
            }
            LifecycleEvent::ProcessRemove { id } => {
                if self.processes.remove(id).is_none() {
                    debug!(id, "removal of untracked process");
                }
            }
            LifecycleEvent::ModuleAdd { code } => {
                self.modules.write().insert(*code);
            }
            LifecycleEvent::ModuleRemove { code } => {
                self.modules.write().remove(code);
            }
            LifecycleEvent::MountAdd { target, fstype } => {
                self.mounts.write().insert(target.clone(), fstype.clone());
            }
            LifecycleEvent::MountRemove { target } => {
                self.mounts.write().remove(target);
            }
        }
    }

    pub fn is_tracked(&self, id: ProcId) -> bool {
        self.processes.contains_key(&id)
    }

    pub fn process(&self, id: ProcId) -> Option<ProcessRecord> {
        self.processes.get(&id).map(|r| *r)
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn modules(&self) -> Vec<i64> {
        self.modules.read().iter().copied().collect()
    }

    /// Filesystem type mounted at `target`
    pub fn mount_fstype(&self, target: &Path) -> Option<String> {
        self.mounts.read().get(target).cloned()
    }

    pub fn mount_count(&self) -> usize {
        self.mounts.read().len()
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}
