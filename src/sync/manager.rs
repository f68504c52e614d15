/*!
 * Synchronization Manager
 * Semaphore and mutex registries with discipline-aware wake-up
 */

use super::mutex::Mutex;
use super::semaphore::Semaphore;
use super::types::{SyncError, SyncResult};
use crate::core::types::{Pid, SyncId};
use crate::process::ProcessTable;
use crate::scheduler::{Policy, Scheduler};
use ahash::RandomState;
use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;

/// Synchronization Manager
///
/// Owns every registered semaphore and mutex. Blocking parks the running
/// PCB on the primitive's wait list; wake-ups re-enter the scheduler
/// through the arrival path, so the active discipline's preemption rules
/// apply unchanged.
#[derive(Clone)]
pub struct SyncManager {
    table: ProcessTable,
    semaphores: Arc<DashMap<SyncId, Semaphore, RandomState>>,
    mutexes: Arc<DashMap<SyncId, Mutex, RandomState>>,
}

impl SyncManager {
    pub fn new(table: ProcessTable) -> Self {
        Self {
            table,
            semaphores: Arc::new(DashMap::with_hasher(RandomState::new())),
            mutexes: Arc::new(DashMap::with_hasher(RandomState::new())),
        }
    }

    /// Register a semaphore with an initial count
    pub fn init_semaphore(&self, id: SyncId, initial: u32) -> SyncResult<()> {
        if self.semaphores.contains_key(&id) {
            return Err(SyncError::AlreadyRegistered(id));
        }
        info!("Semaphore {} registered (initial: {})", id, initial);
        self.semaphores.insert(id, Semaphore::new(initial));
        Ok(())
    }

    /// Register a mutex
    pub fn init_mutex(&self, id: SyncId) -> SyncResult<()> {
        if self.mutexes.contains_key(&id) {
            return Err(SyncError::AlreadyRegistered(id));
        }
        info!("Mutex {} registered", id);
        self.mutexes.insert(id, Mutex::new());
        Ok(())
    }

    /// P operation: decrement or block the running process
    pub fn semaphore_p(&self, id: SyncId, scheduler: &Scheduler) -> SyncResult<Pid> {
        let mut semaphore = self
            .semaphores
            .get_mut(&id)
            .ok_or(SyncError::UnknownSemaphore(id))?;

        if semaphore.try_acquire() {
            debug!(
                "Semaphore {}: PID {} acquired, count now {}",
                id,
                scheduler.current_pid(),
                semaphore.count()
            );
            return Ok(scheduler.current_pid());
        }

        if let Some(blocked) = scheduler.block_current() {
            debug!("Semaphore {}: PID {} waiting", id, blocked);
            semaphore.push_waiter(blocked);
        }
        Ok(scheduler.current_pid())
    }

    /// V operation: wake the best-ranked waiter or increment the count
    pub fn semaphore_v(&self, id: SyncId, scheduler: &Scheduler) -> SyncResult<Pid> {
        let mut semaphore = self
            .semaphores
            .get_mut(&id)
            .ok_or(SyncError::UnknownSemaphore(id))?;

        match self.select_waiter(semaphore.waiters(), scheduler.policy()) {
            Some(index) => {
                let woken = semaphore.take_waiter(index);
                drop(semaphore);
                debug!("Semaphore {}: waking PID {}", id, woken);
                scheduler.admit(woken);
            }
            None => semaphore.release(),
        }
        Ok(scheduler.current_pid())
    }

    /// Acquire a mutex or block the running process
    pub fn mutex_lock(&self, id: SyncId, scheduler: &Scheduler) -> SyncResult<Pid> {
        let mut mutex = self.mutexes.get_mut(&id).ok_or(SyncError::UnknownMutex(id))?;

        if !mutex.is_locked() {
            let owner = scheduler.current_pid();
            mutex.acquire(owner);
            debug!("Mutex {}: locked by PID {}", id, owner);
            return Ok(owner);
        }

        if let Some(blocked) = scheduler.block_current() {
            debug!("Mutex {}: PID {} waiting", id, blocked);
            mutex.push_waiter(blocked);
        }
        Ok(scheduler.current_pid())
    }

    /// Release a mutex, transferring ownership if a waiter is pending
    pub fn mutex_unlock(&self, id: SyncId, scheduler: &Scheduler) -> SyncResult<Pid> {
        let mut mutex = self.mutexes.get_mut(&id).ok_or(SyncError::UnknownMutex(id))?;

        let caller = scheduler.current_pid();
        if mutex.owner() != Some(caller) {
            return Err(SyncError::NotOwner { id, pid: caller });
        }

        match self.select_waiter(mutex.waiters(), scheduler.policy()) {
            Some(index) => {
                let next = mutex.take_waiter(index);
                mutex.transfer(next);
                drop(mutex);
                debug!("Mutex {}: ownership transferred to PID {}", id, next);
                scheduler.admit(next);
            }
            None => {
                mutex.release();
                debug!("Mutex {}: unlocked", id);
            }
        }
        Ok(scheduler.current_pid())
    }

    /// Pick the waiter to wake: (priority, pid) ascending under the
    /// priority discipline, plain pid ascending otherwise
    fn select_waiter(&self, waiters: &[Pid], policy: Policy) -> Option<usize> {
        match policy {
            Policy::Priority => waiters
                .iter()
                .enumerate()
                .min_by_key(|(_, &pid)| self.table.rank(pid))
                .map(|(index, _)| index),
            _ => waiters
                .iter()
                .enumerate()
                .min_by_key(|(_, &pid)| pid)
                .map(|(index, _)| index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{Pcb, ProcessClass};

    fn fixture(policy: Policy, pcbs: &[(Pid, u8)]) -> (SyncManager, Scheduler) {
        let table = ProcessTable::new();
        for &(pid, priority) in pcbs {
            table
                .insert(Pcb::new(pid, priority, ProcessClass::Foreground))
                .unwrap();
        }
        let scheduler = Scheduler::new(policy, table.clone());
        (SyncManager::new(table), scheduler)
    }

    #[test]
    fn test_semaphore_p_blocks_at_zero() {
        let (sync, scheduler) = fixture(Policy::Fcfs, &[(1, 0), (2, 0)]);
        sync.init_semaphore(10, 1).unwrap();
        scheduler.admit(1);
        scheduler.admit(2);

        assert_eq!(sync.semaphore_p(10, &scheduler), Ok(1));
        // Count exhausted: caller parks and process 2 is dispatched
        assert_eq!(sync.semaphore_p(10, &scheduler), Ok(2));
        assert!(!scheduler.contains(1));
    }

    #[test]
    fn test_semaphore_v_wakes_lowest_pid() {
        let (sync, scheduler) = fixture(Policy::Fcfs, &[(3, 0), (5, 0), (9, 0)]);
        sync.init_semaphore(10, 0).unwrap();
        scheduler.admit(9);
        scheduler.admit(5);
        scheduler.admit(3);

        sync.semaphore_p(10, &scheduler).unwrap();
        sync.semaphore_p(10, &scheduler).unwrap();
        assert_eq!(scheduler.current_pid(), 3);

        // PID 5 waits alongside 9; V picks the lower PID first
        assert_eq!(sync.semaphore_v(10, &scheduler), Ok(3));
        assert_eq!(scheduler.on_exit(), 5);
    }

    #[test]
    fn test_semaphore_v_increments_without_waiters() {
        let (sync, scheduler) = fixture(Policy::Fcfs, &[(1, 0)]);
        sync.init_semaphore(10, 0).unwrap();
        scheduler.admit(1);

        sync.semaphore_v(10, &scheduler).unwrap();
        // The banked unit lets the next P through without blocking
        assert_eq!(sync.semaphore_p(10, &scheduler), Ok(1));
        assert_eq!(scheduler.current_pid(), 1);
    }

    #[test]
    fn test_mutex_transfer_on_unlock() {
        let (sync, scheduler) = fixture(Policy::Priority, &[(1, 2), (2, 1)]);
        sync.init_mutex(7).unwrap();

        scheduler.admit(1);
        sync.mutex_lock(7, &scheduler).unwrap();

        // Better-ranked process 2 preempts, then blocks on the held mutex
        assert_eq!(scheduler.admit(2), 2);
        assert_eq!(sync.mutex_lock(7, &scheduler), Ok(1));

        // Ownership moves to process 2, which preempts its way back in
        assert_eq!(sync.mutex_unlock(7, &scheduler), Ok(2));
    }

    #[test]
    fn test_mutex_unlock_requires_owner() {
        let (sync, scheduler) = fixture(Policy::Fcfs, &[(1, 0)]);
        sync.init_mutex(7).unwrap();
        scheduler.admit(1);

        assert_eq!(
            sync.mutex_unlock(7, &scheduler),
            Err(SyncError::NotOwner { id: 7, pid: 1 })
        );
        assert_eq!(
            sync.mutex_unlock(8, &scheduler),
            Err(SyncError::UnknownMutex(8))
        );
    }
}
