/*!
 * Memory Types
 * Common types for memory management
 */

use crate::core::types::{Address, Pid, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("out of memory: requested {requested} bytes, largest free hole {largest} bytes")]
    OutOfMemory { requested: Size, largest: Size },

    #[error("segmentation fault: PID {pid} at address 0x{address:x}")]
    SegmentationFault { pid: Pid, address: Address },
}

/// Contiguous physical segment owned by one process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Address,
    pub size: Size,
}

impl Segment {
    pub fn end(&self) -> Address {
        self.start + self.size
    }
}

/// Memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub kernel_reserved: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub hole_count: usize,
    pub largest_hole: Size,
    pub allocated_segments: usize,
}
