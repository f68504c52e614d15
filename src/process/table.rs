/*!
 * Process Table
 * Owned arena of PCBs, keyed by PID
 */

use super::types::{Pcb, ProcessClass, ProcessError, ProcessResult, ProcessState};
use crate::core::types::{Pid, Priority};
use ahash::RandomState;
use dashmap::DashMap;
use log::info;
use std::sync::Arc;

/// Process registry
///
/// The single owner of every live PCB. Cheap to clone; clones share the
/// underlying table.
#[derive(Clone)]
pub struct ProcessTable {
    processes: Arc<DashMap<Pid, Pcb, RandomState>>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            processes: Arc::new(DashMap::with_hasher(RandomState::new())),
        }
    }

    /// Register a new PCB
    pub fn insert(&self, pcb: Pcb) -> ProcessResult<()> {
        if self.processes.contains_key(&pcb.pid) {
            return Err(ProcessError::DuplicatePid(pcb.pid));
        }
        info!(
            "Process {} registered (priority: {}, class: {:?})",
            pcb.pid, pcb.priority, pcb.class
        );
        self.processes.insert(pcb.pid, pcb);
        Ok(())
    }

    /// Remove a PCB, returning it if it was present
    pub fn remove(&self, pid: Pid) -> Option<Pcb> {
        self.processes.remove(&pid).map(|(_, pcb)| pcb)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    pub fn get(&self, pid: Pid) -> Option<Pcb> {
        self.processes.get(&pid).map(|p| p.value().clone())
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Ordering key for a PID; absent PIDs sort last
    pub fn rank(&self, pid: Pid) -> (Priority, Pid) {
        self.processes
            .get(&pid)
            .map(|p| p.rank())
            .unwrap_or((Priority::MAX, pid))
    }

    pub fn class(&self, pid: Pid) -> ProcessClass {
        self.processes
            .get(&pid)
            .map(|p| p.class)
            .unwrap_or(ProcessClass::Foreground)
    }

    pub fn set_state(&self, pid: Pid, state: ProcessState) {
        if let Some(mut pcb) = self.processes.get_mut(&pid) {
            pcb.state = state;
        }
    }

    pub fn set_priority(&self, pid: Pid, priority: Priority) {
        if let Some(mut pcb) = self.processes.get_mut(&pid) {
            pcb.priority = priority;
        }
    }

    /// Record a leftover time slice to resume with on the next dispatch
    pub fn save_quantum(&self, pid: Pid, remaining: u32) {
        if let Some(mut pcb) = self.processes.get_mut(&pid) {
            pcb.saved_quantum = Some(remaining);
        }
    }

    /// Consume a previously saved time slice, if any
    pub fn take_saved_quantum(&self, pid: Pid) -> Option<u32> {
        self.processes
            .get_mut(&pid)
            .and_then(|mut pcb| pcb.saved_quantum.take())
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
