/*!
 * CPU Scheduler
 * Four disciplines behind one event contract
 */

use crate::core::types::Pid;
use crate::process::ProcessTable;
use log::info;
use parking_lot::RwLock;
use std::sync::Arc;

mod operations;
mod queues;
mod types;

pub use types::{Occupant, Policy, SchedulerStats, LEVEL_SWITCH_PERIOD, RR_QUANTUM, TIMER_TICK};

use queues::ReadyQueue;

/// Mutable scheduling state, guarded as one unit
struct SchedState {
    ready: ReadyQueue,
    current: Occupant,
    /// Time consumed by the running process in its current slice
    slice_elapsed: u32,
    /// Slice length granted at the last dispatch
    slice_limit: u32,
    /// Time since the last multilevel level-switch boundary
    level_elapsed: u32,
    stats: SchedulerStats,
}

/// CPU Scheduler
///
/// Owns the ready structures, the current occupant and all quantum and
/// level bookkeeping. Every mutating operation returns the PID running
/// after the operation completes.
pub struct Scheduler {
    policy: Policy,
    table: ProcessTable,
    state: Arc<RwLock<SchedState>>,
}

impl Scheduler {
    pub fn new(policy: Policy, table: ProcessTable) -> Self {
        info!("Scheduler initialized: policy={:?}", policy);
        Self {
            policy,
            table,
            state: Arc::new(RwLock::new(SchedState {
                ready: ReadyQueue::for_policy(policy),
                current: Occupant::Idle,
                slice_elapsed: 0,
                slice_limit: RR_QUANTUM,
                level_elapsed: 0,
                stats: SchedulerStats::new(policy),
            })),
        }
    }

    /// Active discipline
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// PID running right now ([`crate::core::types::IDLE_PID`] when idle)
    pub fn current_pid(&self) -> Pid {
        self.state.read().current.pid()
    }

    /// Number of runnable processes, the running one included
    pub fn len(&self) -> usize {
        let state = self.state.read();
        state.ready.len() + usize::from(!state.current.is_idle())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a PID is running or queued
    pub fn contains(&self, pid: Pid) -> bool {
        let state = self.state.read();
        state.current == Occupant::Running(pid) || state.ready.contains(pid)
    }

    pub fn stats(&self) -> SchedulerStats {
        self.state.read().stats.clone()
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            table: self.table.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IDLE_PID;
    use crate::process::{Pcb, ProcessClass};

    fn scheduler_with(policy: Policy, pcbs: &[(Pid, u8, ProcessClass)]) -> Scheduler {
        let table = ProcessTable::new();
        for &(pid, priority, class) in pcbs {
            table.insert(Pcb::new(pid, priority, class)).unwrap();
        }
        Scheduler::new(policy, table)
    }

    #[test]
    fn test_fcfs_no_preemption() {
        let scheduler = scheduler_with(
            Policy::Fcfs,
            &[
                (1, 0, ProcessClass::Foreground),
                (2, 0, ProcessClass::Foreground),
            ],
        );

        assert_eq!(scheduler.admit(1), 1);
        assert_eq!(scheduler.admit(2), 1);
        assert_eq!(scheduler.on_timer_tick(), 1);
        assert_eq!(scheduler.on_exit(), 2);
        assert_eq!(scheduler.on_exit(), IDLE_PID);
    }

    #[test]
    fn test_priority_arrival_preempts() {
        let scheduler = scheduler_with(
            Policy::Priority,
            &[
                (5, 3, ProcessClass::Foreground),
                (2, 1, ProcessClass::Foreground),
            ],
        );

        assert_eq!(scheduler.admit(5), 5);
        assert_eq!(scheduler.admit(2), 2);
        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.on_exit(), 5);
    }

    #[test]
    fn test_priority_tie_breaks_by_pid() {
        let scheduler = scheduler_with(
            Policy::Priority,
            &[
                (8, 2, ProcessClass::Foreground),
                (3, 2, ProcessClass::Foreground),
            ],
        );

        assert_eq!(scheduler.admit(8), 8);
        // Same priority, lower PID: preempts
        assert_eq!(scheduler.admit(3), 3);
    }

    #[test]
    fn test_round_robin_full_quantum() {
        let scheduler = scheduler_with(
            Policy::RoundRobin,
            &[
                (1, 0, ProcessClass::Foreground),
                (2, 0, ProcessClass::Foreground),
            ],
        );

        scheduler.admit(1);
        scheduler.admit(2);

        // Three ticks in, process 1 still holds its slice
        for _ in 0..3 {
            assert_eq!(scheduler.on_timer_tick(), 1);
        }
        // Fourth tick exhausts the 40-unit quantum
        assert_eq!(scheduler.on_timer_tick(), 2);
        // Process 1 went to the tail and comes back after process 2's slice
        for _ in 0..3 {
            assert_eq!(scheduler.on_timer_tick(), 2);
        }
        assert_eq!(scheduler.on_timer_tick(), 1);
    }

    #[test]
    fn test_set_priority_swaps_under_priority() {
        let scheduler = scheduler_with(
            Policy::Priority,
            &[
                (1, 1, ProcessClass::Foreground),
                (6, 4, ProcessClass::Foreground),
            ],
        );

        scheduler.admit(1);
        scheduler.admit(6);
        assert_eq!(scheduler.current_pid(), 1);

        // Demoting the running process below the best ready one swaps them
        assert_eq!(scheduler.on_set_priority(7), 6);
        assert_eq!(scheduler.on_exit(), 1);
    }

    #[test]
    fn test_block_and_wake() {
        let scheduler = scheduler_with(
            Policy::Fcfs,
            &[
                (1, 0, ProcessClass::Foreground),
                (2, 0, ProcessClass::Foreground),
            ],
        );

        scheduler.admit(1);
        scheduler.admit(2);

        assert_eq!(scheduler.block_current(), Some(1));
        assert_eq!(scheduler.current_pid(), 2);

        // Wake-up re-enters through the arrival path
        assert_eq!(scheduler.admit(1), 2);
        assert_eq!(scheduler.on_exit(), 1);
    }
}
