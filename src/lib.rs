/*!
 * Simulated OS Kernel
 * Decision core for a discrete-event operating-system simulation
 *
 * The external simulator delivers deterministic events (arrivals,
 * syscalls, timer ticks) one at a time; the core updates scheduling,
 * memory and synchronization state and returns the PID that should now
 * execute. No real I/O, timing or process execution happens here.
 */

pub mod core;
pub mod kernel;
pub mod memory;
pub mod process;
pub mod scheduler;
pub mod sync;

// Re-exports
pub use crate::core::types::{Address, Pid, Priority, Size, SyncId, IDLE_PID};
pub use crate::kernel::{Kernel, KernelBuilder, KernelConfig};
pub use crate::memory::{
    AddressTranslator, MemoryError, MemoryManager, MemoryResult, MemoryStats, Segment, VIRT_BASE,
};
pub use crate::process::{Pcb, ProcessClass, ProcessError, ProcessResult, ProcessState, ProcessTable};
pub use crate::scheduler::{
    Occupant, Policy, Scheduler, SchedulerStats, LEVEL_SWITCH_PERIOD, RR_QUANTUM, TIMER_TICK,
};
pub use crate::sync::{SyncError, SyncManager, SyncResult};
