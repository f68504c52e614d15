/*!
 * Scheduler Operations
 * Arrival, exit, priority change, blocking and timer handling
 */

use super::types::{Occupant, Policy, LEVEL_SWITCH_PERIOD, RR_QUANTUM, TIMER_TICK};
use super::{SchedState, Scheduler};
use crate::core::types::{Pid, Priority, IDLE_PID};
use crate::process::{ProcessClass, ProcessState};
use log::{debug, info};

impl Scheduler {
    /// Admit a process to the ready structures
    ///
    /// Serves both fresh arrivals and wake-ups from synchronization waits;
    /// the preemption rules are identical.
    pub fn admit(&self, pid: Pid) -> Pid {
        let mut state = self.state.write();
        let class = self.table.class(pid);
        self.table.set_state(pid, ProcessState::Ready);

        match self.policy {
            Policy::Fcfs | Policy::RoundRobin | Policy::Multilevel => {
                state.ready.push(pid, class);
                if state.current.is_idle() {
                    self.dispatch(&mut state);
                }
            }
            Policy::Priority => match state.current {
                Occupant::Idle => {
                    state.ready.push(pid, class);
                    self.dispatch(&mut state);
                }
                Occupant::Running(running) => {
                    if self.table.rank(pid) < self.table.rank(running) {
                        self.table.set_state(running, ProcessState::Ready);
                        state.ready.push(running, self.table.class(running));
                        self.run(&mut state, pid);
                        state.stats.preemptions += 1;
                        info!("Process {} preempted {} on arrival", pid, running);
                    } else {
                        state.ready.push(pid, class);
                    }
                }
            },
        }

        state.current.pid()
    }

    /// Handle the running process's exit syscall
    pub fn on_exit(&self) -> Pid {
        let mut state = self.state.write();
        if let Occupant::Running(pid) = state.current {
            debug!("Process {} released the CPU on exit", pid);
            state.current = Occupant::Idle;
        }
        self.dispatch(&mut state).pid()
    }

    /// Change the running process's priority
    pub fn on_set_priority(&self, new_priority: Priority) -> Pid {
        let mut state = self.state.write();
        let running = match state.current {
            Occupant::Running(pid) => pid,
            Occupant::Idle => return IDLE_PID,
        };
        self.table.set_priority(running, new_priority);
        info!("Process {} set priority to {}", running, new_priority);

        if self.policy == Policy::Priority {
            if let Some(best) = state.ready.best_ranked(&self.table) {
                if self.table.rank(best) < self.table.rank(running) {
                    state.ready.remove(best);
                    self.table.set_state(running, ProcessState::Ready);
                    state.ready.push(running, self.table.class(running));
                    self.run(&mut state, best);
                    state.stats.preemptions += 1;
                    info!(
                        "Process {} displaced {} after priority change",
                        best, running
                    );
                }
            }
        }

        state.current.pid()
    }

    /// Park the running process for a synchronization wait and dispatch a
    /// replacement; returns the parked PID
    pub fn block_current(&self) -> Option<Pid> {
        let mut state = self.state.write();
        let pid = match state.current {
            Occupant::Running(pid) => pid,
            Occupant::Idle => return None,
        };
        self.table.set_state(pid, ProcessState::Waiting);
        state.current = Occupant::Idle;
        debug!("Process {} blocked", pid);
        self.dispatch(&mut state);
        Some(pid)
    }

    /// Advance time-based bookkeeping by one timer tick
    pub fn on_timer_tick(&self) -> Pid {
        let mut state = self.state.write();
        state.stats.ticks += 1;

        match self.policy {
            Policy::Fcfs | Policy::Priority => {}
            Policy::RoundRobin => self.round_robin_tick(&mut state),
            Policy::Multilevel => self.multilevel_tick(&mut state),
        }

        state.current.pid()
    }

    fn round_robin_tick(&self, state: &mut SchedState) {
        let pid = match state.current {
            Occupant::Running(pid) => pid,
            Occupant::Idle => return,
        };
        state.slice_elapsed += TIMER_TICK;
        if state.slice_elapsed >= state.slice_limit {
            self.table.set_state(pid, ProcessState::Ready);
            state.ready.push(pid, self.table.class(pid));
            state.current = Occupant::Idle;
            state.stats.preemptions += 1;
            info!("Process {} exhausted its quantum", pid);
            self.dispatch(state);
        }
    }

    fn multilevel_tick(&self, state: &mut SchedState) {
        state.level_elapsed += TIMER_TICK;

        // Quantum accounting applies to the foreground level only. Expiry
        // is resolved before the level-switch check: a slice that dies on a
        // boundary tick requeues to the tail, not the front.
        if state.ready.level() == ProcessClass::Foreground {
            if let Occupant::Running(pid) = state.current {
                state.slice_elapsed += TIMER_TICK;
                if state.slice_elapsed >= state.slice_limit {
                    self.table.set_state(pid, ProcessState::Ready);
                    state.ready.push(pid, ProcessClass::Foreground);
                    state.current = Occupant::Idle;
                    state.stats.preemptions += 1;
                    info!("Foreground process {} exhausted its slice", pid);
                    self.dispatch(state);
                }
            }
        }

        if state.level_elapsed >= LEVEL_SWITCH_PERIOD {
            state.level_elapsed = 0;
            let level = state.ready.level();
            // The switch fires only when the other level has work
            if state.ready.level_len(level.other()) > 0 {
                if let Occupant::Running(pid) = state.current {
                    match level {
                        ProcessClass::Foreground => {
                            // Resumes from the queue front with the leftover
                            // slice
                            let remaining = state.slice_limit - state.slice_elapsed;
                            self.table.save_quantum(pid, remaining);
                            state.ready.push_front(pid, ProcessClass::Foreground);
                        }
                        ProcessClass::Background => {
                            state.ready.push_front(pid, ProcessClass::Background);
                        }
                    }
                    self.table.set_state(pid, ProcessState::Ready);
                    state.current = Occupant::Idle;
                    state.stats.preemptions += 1;
                }
                let new_level = state.ready.switch_level();
                info!("Level switch: now servicing {:?}", new_level);
                self.dispatch(state);
            }
        }
    }

    /// Pull the next eligible process, falling back to idle
    fn dispatch(&self, state: &mut SchedState) -> Occupant {
        match state.ready.pop(&self.table) {
            Some(pid) => self.run(state, pid),
            None => {
                state.current = Occupant::Idle;
                state.slice_elapsed = 0;
                state.slice_limit = RR_QUANTUM;
            }
        }
        state.current
    }

    /// Install a process as the running occupant with a fresh slice
    fn run(&self, state: &mut SchedState, pid: Pid) {
        state.current = Occupant::Running(pid);
        state.slice_elapsed = 0;
        state.slice_limit = self.table.take_saved_quantum(pid).unwrap_or(RR_QUANTUM);
        self.table.set_state(pid, ProcessState::Running);
        state.stats.total_scheduled += 1;
        state.stats.context_switches += 1;
        debug!("Dispatched process {} ({:?})", pid, self.policy);
    }
}
