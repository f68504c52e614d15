/*!
 * Memory Manager
 * Contiguous best-fit allocator over one linear address space
 */

use super::free_list::{FreeList, Hole};
use super::types::{MemoryError, MemoryResult, MemoryStats, Segment};
use crate::core::types::{Pid, Size};
use ahash::RandomState;
use dashmap::DashMap;
use log::{info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

/// Memory Manager
///
/// Partitions `[0, total_memory)` into the permanently reserved kernel
/// region `[0, kernel_reserved)`, free holes and one segment per live
/// process. Clones share the same segment table and free list, which is
/// how the address translator reads live mappings.
#[derive(Clone)]
pub struct MemoryManager {
    total_memory: Size,
    kernel_reserved: Size,
    segments: Arc<DashMap<Pid, Segment, RandomState>>,
    free_list: Arc<Mutex<FreeList>>,
}

impl MemoryManager {
    pub fn new(total_memory: Size, kernel_reserved: Size) -> Self {
        let allocatable = total_memory.saturating_sub(kernel_reserved);
        info!(
            "Memory manager initialized: {} bytes total, {} reserved for kernel",
            total_memory, kernel_reserved
        );
        Self {
            total_memory,
            kernel_reserved,
            segments: Arc::new(DashMap::with_hasher(RandomState::new())),
            free_list: Arc::new(Mutex::new(FreeList::new(kernel_reserved, allocatable))),
        }
    }

    /// Reserve a contiguous segment for a process
    ///
    /// Best-fit: the smallest hole that satisfies the request wins, ties by
    /// lowest start address. Exhaustion is a normal outcome, not a fault.
    pub fn reserve(&self, pid: Pid, size: Size) -> MemoryResult<Segment> {
        let mut free_list = self.free_list.lock();

        let hole = match free_list.take_best_fit(size) {
            Some(hole) => hole,
            None => {
                let largest = free_list.largest();
                warn!(
                    "Reservation failed: PID {} requested {} bytes, largest hole {} bytes",
                    pid, size, largest
                );
                return Err(MemoryError::OutOfMemory {
                    requested: size,
                    largest,
                });
            }
        };

        // Return the unused tail of the hole
        if hole.size > size {
            free_list.insert(Hole {
                start: hole.start + size,
                size: hole.size - size,
            });
        }
        drop(free_list);

        let segment = Segment {
            start: hole.start,
            size,
        };
        self.segments.insert(pid, segment);

        info!(
            "Reserved {} bytes at 0x{:x} for PID {}",
            size, segment.start, pid
        );
        Ok(segment)
    }

    /// Release a process's segment and coalesce the freed hole
    pub fn release(&self, pid: Pid) -> Option<Segment> {
        let (_, segment) = self.segments.remove(&pid)?;

        self.free_list.lock().insert(Hole {
            start: segment.start,
            size: segment.size,
        });

        info!(
            "Released {} bytes at 0x{:x} from PID {}",
            segment.size, segment.start, pid
        );
        Some(segment)
    }

    /// Live segment for a process, if one is registered
    pub fn segment(&self, pid: Pid) -> Option<Segment> {
        self.segments.get(&pid).map(|s| *s)
    }

    pub fn stats(&self) -> MemoryStats {
        let free_list = self.free_list.lock();
        let free_memory = free_list.total_free();
        MemoryStats {
            total_memory: self.total_memory,
            kernel_reserved: self.kernel_reserved,
            used_memory: self
                .total_memory
                .saturating_sub(self.kernel_reserved)
                .saturating_sub(free_memory),
            free_memory,
            hole_count: free_list.len(),
            largest_hole: free_list.largest(),
            allocated_segments: self.segments.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_splits_hole() {
        let memory = MemoryManager::new(100, 10);

        let a = memory.reserve(1, 30).unwrap();
        assert_eq!(a, Segment { start: 10, size: 30 });

        let b = memory.reserve(2, 20).unwrap();
        assert_eq!(b, Segment { start: 40, size: 20 });
    }

    #[test]
    fn test_release_reuses_freed_hole() {
        let memory = MemoryManager::new(100, 10);

        memory.reserve(1, 30).unwrap();
        memory.reserve(2, 20).unwrap();

        memory.release(1);

        // A 25-byte request best-fits the freed 30-byte hole at 10, not the
        // 40-byte tail hole at 60.
        let c = memory.reserve(3, 25).unwrap();
        assert_eq!(c.start, 10);
    }

    #[test]
    fn test_exhaustion_is_reported() {
        let memory = MemoryManager::new(100, 10);

        let err = memory.reserve(1, 91).unwrap_err();
        assert_eq!(
            err,
            MemoryError::OutOfMemory {
                requested: 91,
                largest: 90,
            }
        );
        assert!(memory.segment(1).is_none());
    }

    #[test]
    fn test_release_coalesces_with_both_neighbors() {
        let memory = MemoryManager::new(100, 0);

        memory.reserve(1, 20).unwrap();
        memory.reserve(2, 20).unwrap();
        memory.reserve(3, 20).unwrap();

        memory.release(1);
        memory.release(3);
        // 40..60 merged with the tail hole at 60..100
        assert_eq!(memory.stats().hole_count, 2);

        // Freeing the middle segment merges all three holes and the tail
        memory.release(2);
        assert_eq!(memory.stats().hole_count, 1);
        assert_eq!(memory.stats().largest_hole, 100);
    }
}
