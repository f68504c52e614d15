/*!
 * Mutex
 * Simulated mutex state with ownership transfer
 */

use crate::core::types::Pid;

/// Mutex with an ordered wait list
///
/// Locked exactly when an owner is recorded. On unlock with waiters
/// pending, ownership transfers directly without an unlocked window.
#[derive(Debug, Default)]
pub struct Mutex {
    owner: Option<Pid>,
    waiters: Vec<Pid>,
}

impl Mutex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<Pid> {
        self.owner
    }

    pub fn is_locked(&self) -> bool {
        self.owner.is_some()
    }

    /// Record `pid` as the owner; the mutex must be free
    pub fn acquire(&mut self, pid: Pid) {
        self.owner = Some(pid);
    }

    /// Hand the lock to a woken waiter without unlocking in between
    pub fn transfer(&mut self, pid: Pid) {
        self.owner = Some(pid);
    }

    pub fn release(&mut self) {
        self.owner = None;
    }

    pub fn push_waiter(&mut self, pid: Pid) {
        self.waiters.push(pid);
    }

    pub fn take_waiter(&mut self, index: usize) -> Pid {
        self.waiters.remove(index)
    }

    pub fn waiters(&self) -> &[Pid] {
        &self.waiters
    }
}
