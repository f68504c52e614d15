/*!
 * Core Types
 * Common types used across the kernel
 */

/// Process ID type
pub type Pid = u32;

/// Address type for memory operations
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

/// Priority level (0-255, lower is more urgent)
pub type Priority = u8;

/// Identifier for synchronization primitives
pub type SyncId = u32;

/// PID of the idle process
///
/// The idle process is never registered in the process table and never
/// queued; it is what "runs" when no real process is eligible.
pub const IDLE_PID: Pid = 0;
