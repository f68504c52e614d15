/*!
 * Ready Structures
 * Per-discipline containers for runnable processes
 */

use super::types::Policy;
use crate::core::types::Pid;
use crate::process::{ProcessClass, ProcessTable};
use std::collections::VecDeque;

/// Ready structure for the active discipline
///
/// Holds bare PIDs; PCB attributes are read from the process table at
/// selection time so ranking never goes stale.
#[derive(Debug)]
pub(super) enum ReadyQueue {
    /// FCFS and round-robin share one FIFO
    Fifo(VecDeque<Pid>),
    /// Priority keeps an unordered collection; selection is a linear
    /// min-scan by (priority, pid), preserving exact tie-break semantics
    Ranked(Vec<Pid>),
    /// Multilevel feedback: two FIFOs plus the level being serviced
    TwoLevel {
        foreground: VecDeque<Pid>,
        background: VecDeque<Pid>,
        level: ProcessClass,
    },
}

impl ReadyQueue {
    pub fn for_policy(policy: Policy) -> Self {
        match policy {
            Policy::Fcfs | Policy::RoundRobin => ReadyQueue::Fifo(VecDeque::new()),
            Policy::Priority => ReadyQueue::Ranked(Vec::new()),
            Policy::Multilevel => ReadyQueue::TwoLevel {
                foreground: VecDeque::new(),
                background: VecDeque::new(),
                level: ProcessClass::Foreground,
            },
        }
    }

    /// Enqueue in arrival order; multilevel routes by class
    pub fn push(&mut self, pid: Pid, class: ProcessClass) {
        match self {
            ReadyQueue::Fifo(queue) => queue.push_back(pid),
            ReadyQueue::Ranked(ready) => ready.push(pid),
            ReadyQueue::TwoLevel {
                foreground,
                background,
                ..
            } => match class {
                ProcessClass::Foreground => foreground.push_back(pid),
                ProcessClass::Background => background.push_back(pid),
            },
        }
    }

    /// Enqueue at the head, used when a level switch preempts mid-queue
    pub fn push_front(&mut self, pid: Pid, class: ProcessClass) {
        match self {
            ReadyQueue::Fifo(queue) => queue.push_front(pid),
            ReadyQueue::Ranked(ready) => ready.push(pid),
            ReadyQueue::TwoLevel {
                foreground,
                background,
                ..
            } => match class {
                ProcessClass::Foreground => foreground.push_front(pid),
                ProcessClass::Background => background.push_front(pid),
            },
        }
    }

    /// Remove and return the next eligible PID, if any
    ///
    /// Multilevel draws from the level currently being serviced only; a
    /// populated other level never substitutes for an empty current one.
    pub fn pop(&mut self, table: &ProcessTable) -> Option<Pid> {
        match self {
            ReadyQueue::Fifo(queue) => queue.pop_front(),
            ReadyQueue::Ranked(ready) => {
                let best = Self::min_ranked(ready, table)?;
                Some(ready.swap_remove(best))
            }
            ReadyQueue::TwoLevel {
                foreground,
                background,
                level,
            } => match level {
                ProcessClass::Foreground => foreground.pop_front(),
                ProcessClass::Background => background.pop_front(),
            },
        }
    }

    /// Best-ranked ready PID without removing it (priority discipline)
    pub fn best_ranked(&self, table: &ProcessTable) -> Option<Pid> {
        match self {
            ReadyQueue::Ranked(ready) => Self::min_ranked(ready, table).map(|idx| ready[idx]),
            _ => None,
        }
    }

    /// Remove a specific PID; true if it was present
    pub fn remove(&mut self, pid: Pid) -> bool {
        match self {
            ReadyQueue::Fifo(queue) => {
                let before = queue.len();
                queue.retain(|&p| p != pid);
                queue.len() < before
            }
            ReadyQueue::Ranked(ready) => {
                if let Some(idx) = ready.iter().position(|&p| p == pid) {
                    ready.swap_remove(idx);
                    true
                } else {
                    false
                }
            }
            ReadyQueue::TwoLevel {
                foreground,
                background,
                ..
            } => {
                let before = foreground.len() + background.len();
                foreground.retain(|&p| p != pid);
                background.retain(|&p| p != pid);
                foreground.len() + background.len() < before
            }
        }
    }

    pub fn contains(&self, pid: Pid) -> bool {
        match self {
            ReadyQueue::Fifo(queue) => queue.contains(&pid),
            ReadyQueue::Ranked(ready) => ready.contains(&pid),
            ReadyQueue::TwoLevel {
                foreground,
                background,
                ..
            } => foreground.contains(&pid) || background.contains(&pid),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReadyQueue::Fifo(queue) => queue.len(),
            ReadyQueue::Ranked(ready) => ready.len(),
            ReadyQueue::TwoLevel {
                foreground,
                background,
                ..
            } => foreground.len() + background.len(),
        }
    }

    /// Level being serviced; single-level disciplines report foreground
    pub fn level(&self) -> ProcessClass {
        match self {
            ReadyQueue::TwoLevel { level, .. } => *level,
            _ => ProcessClass::Foreground,
        }
    }

    pub fn level_len(&self, which: ProcessClass) -> usize {
        match self {
            ReadyQueue::TwoLevel {
                foreground,
                background,
                ..
            } => match which {
                ProcessClass::Foreground => foreground.len(),
                ProcessClass::Background => background.len(),
            },
            _ => 0,
        }
    }

    /// Flip the serviced level, returning the new one
    pub fn switch_level(&mut self) -> ProcessClass {
        match self {
            ReadyQueue::TwoLevel { level, .. } => {
                *level = level.other();
                *level
            }
            _ => ProcessClass::Foreground,
        }
    }

    fn min_ranked(ready: &[Pid], table: &ProcessTable) -> Option<usize> {
        ready
            .iter()
            .enumerate()
            .min_by_key(|(_, &pid)| table.rank(pid))
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Pcb;

    fn table_with(pcbs: &[(Pid, u8)]) -> ProcessTable {
        let table = ProcessTable::new();
        for &(pid, priority) in pcbs {
            table
                .insert(Pcb::new(pid, priority, ProcessClass::Foreground))
                .unwrap();
        }
        table
    }

    #[test]
    fn test_fifo_preserves_arrival_order() {
        let table = table_with(&[(1, 0), (2, 0), (3, 0)]);
        let mut queue = ReadyQueue::for_policy(Policy::Fcfs);

        queue.push(1, ProcessClass::Foreground);
        queue.push(2, ProcessClass::Foreground);
        queue.push(3, ProcessClass::Foreground);

        assert_eq!(queue.pop(&table), Some(1));
        assert_eq!(queue.pop(&table), Some(2));
        assert_eq!(queue.pop(&table), Some(3));
        assert_eq!(queue.pop(&table), None);
    }

    #[test]
    fn test_ranked_selects_min_priority_then_pid() {
        let table = table_with(&[(5, 3), (9, 1), (2, 1)]);
        let mut queue = ReadyQueue::for_policy(Policy::Priority);

        queue.push(5, ProcessClass::Foreground);
        queue.push(9, ProcessClass::Foreground);
        queue.push(2, ProcessClass::Foreground);

        // Priority 1 beats 3; PID 2 beats PID 9 on the tie
        assert_eq!(queue.pop(&table), Some(2));
        assert_eq!(queue.pop(&table), Some(9));
        assert_eq!(queue.pop(&table), Some(5));
    }

    #[test]
    fn test_two_level_pops_current_level_only() {
        let table = table_with(&[(1, 0)]);
        let mut queue = ReadyQueue::for_policy(Policy::Multilevel);

        queue.push(7, ProcessClass::Background);
        assert_eq!(queue.level(), ProcessClass::Foreground);
        assert_eq!(queue.pop(&table), None);

        assert_eq!(queue.switch_level(), ProcessClass::Background);
        assert_eq!(queue.pop(&table), Some(7));
    }
}
