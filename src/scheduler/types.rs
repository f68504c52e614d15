/*!
 * Scheduler Types
 * Discipline selection, occupant tracking and time constants
 */

use crate::core::types::{Pid, IDLE_PID};
use serde::{Deserialize, Serialize};

/// Length of one timer tick, in simulated time units
pub const TIMER_TICK: u32 = 10;

/// Time slice granted to round-robin and foreground dispatches
pub const RR_QUANTUM: u32 = 40;

/// Period of the multilevel feedback level switch
pub const LEVEL_SWITCH_PERIOD: u32 = 200;

/// Scheduling discipline, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// First-come first-served, no preemption
    Fcfs,
    /// Preemptive priority, lowest (priority, pid) first
    Priority,
    /// Round-robin with a fixed quantum
    RoundRobin,
    /// Two-level feedback: round-robin foreground, FCFS background
    Multilevel,
}

/// What currently holds the CPU
///
/// Explicit tri-state instead of a sentinel PCB, so idleness never relies
/// on identity comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Idle,
    Running(Pid),
}

impl Occupant {
    /// The running PID, or [`IDLE_PID`] when idle
    pub fn pid(&self) -> Pid {
        match self {
            Occupant::Idle => IDLE_PID,
            Occupant::Running(pid) => *pid,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Occupant::Idle)
    }
}

/// Scheduler statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub policy: Policy,
    pub total_scheduled: u64,
    pub context_switches: u64,
    pub preemptions: u64,
    pub ticks: u64,
}

impl SchedulerStats {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            total_scheduled: 0,
            context_switches: 0,
            preemptions: 0,
            ticks: 0,
        }
    }
}
