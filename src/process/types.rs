/*!
 * Process Types
 * PCB definition and process-related errors
 */

use crate::core::types::{Pid, Priority};
use crate::memory::MemoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("memory reservation failed: {0}")]
    AllocationFailed(#[from] MemoryError),

    #[error("process {0} already registered")]
    DuplicatePid(Pid),
}

/// Scheduling class of a process, fixed at arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessClass {
    /// Time-sliced level of the multilevel discipline
    Foreground,
    /// FCFS level of the multilevel discipline
    Background,
}

impl ProcessClass {
    pub fn other(self) -> Self {
        match self {
            ProcessClass::Foreground => ProcessClass::Background,
            ProcessClass::Background => ProcessClass::Foreground,
        }
    }
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Process is ready to run
    Ready,
    /// Process is currently running
    Running,
    /// Process is parked on a semaphore or mutex
    Waiting,
}

/// Process control block
///
/// PCBs are owned exclusively by the [`ProcessTable`](super::ProcessTable);
/// scheduler queues and wait lists hold bare PIDs, so moving a process
/// between structures is an index transfer and can never duplicate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pcb {
    pub pid: Pid,
    pub priority: Priority,
    pub class: ProcessClass,
    pub state: ProcessState,
    /// Remaining time slice, set only when a foreground process is
    /// preempted by a level switch mid-slice.
    pub saved_quantum: Option<u32>,
}

impl Pcb {
    pub fn new(pid: Pid, priority: Priority, class: ProcessClass) -> Self {
        Self {
            pid,
            priority,
            class,
            state: ProcessState::Ready,
            saved_quantum: None,
        }
    }

    /// Ordering key for preemption and wake-up decisions
    pub fn rank(&self) -> (Priority, Pid) {
        (self.priority, self.pid)
    }
}
