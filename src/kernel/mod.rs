/*!
 * Kernel Facade
 * The single event surface the external simulator drives
 */

use crate::core::types::{Address, Pid, Priority, Size, SyncId, IDLE_PID};
use crate::memory::{AddressTranslator, MemoryManager, MemoryResult, MemoryStats};
use crate::process::{Pcb, ProcessClass, ProcessError, ProcessResult, ProcessTable};
use crate::scheduler::{Scheduler, SchedulerStats};
use crate::sync::{SyncManager, SyncResult};
use log::info;

mod builder;

pub use builder::{KernelBuilder, KernelConfig};

/// Kernel decision core
///
/// A pure state machine: the external discrete-event simulator delivers
/// one event at a time, the kernel updates scheduling, memory and
/// synchronization state, and every event answers with the PID that
/// should now execute.
#[derive(Clone)]
pub struct Kernel {
    table: ProcessTable,
    memory: MemoryManager,
    translator: AddressTranslator,
    scheduler: Scheduler,
    sync: SyncManager,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    pub fn new(config: KernelConfig) -> Self {
        KernelBuilder::new()
            .with_policy(config.policy)
            .with_total_memory(config.total_memory)
            .with_kernel_reserved(config.kernel_reserved)
            .build()
    }

    /// A new process arrived
    ///
    /// Memory is reserved before the PCB exists; a failed reservation
    /// rejects the arrival wholesale. `memory_needed == 0` means no
    /// allocation was requested.
    pub fn process_arrived(
        &self,
        pid: Pid,
        priority: Priority,
        class: ProcessClass,
        memory_needed: Size,
    ) -> ProcessResult<Pid> {
        if self.table.contains(pid) {
            return Err(ProcessError::DuplicatePid(pid));
        }
        if memory_needed > 0 {
            self.memory.reserve(pid, memory_needed)?;
        }
        self.table.insert(Pcb::new(pid, priority, class))?;
        Ok(self.scheduler.admit(pid))
    }

    /// The running process performed an exit syscall
    pub fn exit(&self) -> Pid {
        let pid = self.scheduler.current_pid();
        if pid == IDLE_PID {
            return IDLE_PID;
        }

        let _ = self.memory.release(pid);
        let next = self.scheduler.on_exit();
        let _ = self.table.remove(pid);
        info!("Process {} exited, {} now running", pid, next);
        next
    }

    /// The running process changed its own priority
    pub fn set_priority(&self, new_priority: Priority) -> Pid {
        self.scheduler.on_set_priority(new_priority)
    }

    /// Hardware timer fired (one fixed 10-unit tick)
    pub fn timer_interrupt(&self) -> Pid {
        self.scheduler.on_timer_tick()
    }

    /// Register a semaphore
    pub fn init_semaphore(&self, id: SyncId, initial: u32) -> SyncResult<()> {
        self.sync.init_semaphore(id, initial)
    }

    /// Register a mutex
    pub fn init_mutex(&self, id: SyncId) -> SyncResult<()> {
        self.sync.init_mutex(id)
    }

    /// The running process called P on a semaphore
    pub fn semaphore_p(&self, id: SyncId) -> SyncResult<Pid> {
        self.sync.semaphore_p(id, &self.scheduler)
    }

    /// The running process called V on a semaphore
    pub fn semaphore_v(&self, id: SyncId) -> SyncResult<Pid> {
        self.sync.semaphore_v(id, &self.scheduler)
    }

    /// The running process requested a mutex
    pub fn mutex_lock(&self, id: SyncId) -> SyncResult<Pid> {
        self.sync.mutex_lock(id, &self.scheduler)
    }

    /// The running process released a mutex it owns
    pub fn mutex_unlock(&self, id: SyncId) -> SyncResult<Pid> {
        self.sync.mutex_unlock(id, &self.scheduler)
    }

    /// Translate a virtual address for a process
    pub fn translate(&self, pid: Pid, address: Address) -> MemoryResult<Address> {
        self.translator.translate(pid, address)
    }

    /// PID currently holding the CPU
    pub fn running(&self) -> Pid {
        self.scheduler.current_pid()
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn memory_stats(&self) -> MemoryStats {
        self.memory.stats()
    }
}
