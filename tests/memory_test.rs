/*!
 * Memory Tests
 * Best-fit placement, coalescing and translation properties
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sim_os_kernel::{AddressTranslator, MemoryManager, Segment, VIRT_BASE};
use std::collections::HashSet;

#[test]
fn test_best_fit_reuses_freed_hole() {
    let memory = MemoryManager::new(100, 10);

    let a = memory.reserve(1, 30).unwrap();
    assert_eq!(a, Segment { start: 10, size: 30 });
    let b = memory.reserve(2, 20).unwrap();
    assert_eq!(b, Segment { start: 40, size: 20 });

    memory.release(1);

    // Holes are now 30 bytes at 10 and 40 bytes at 60; best-fit for 25
    // takes the smaller one
    let c = memory.reserve(3, 25).unwrap();
    assert_eq!(c.start, 10);

    // The next request no longer fits the 5-byte sliver at 35
    let d = memory.reserve(4, 40).unwrap();
    assert_eq!(d.start, 60);
}

#[test]
fn test_ties_prefer_lowest_start() {
    let memory = MemoryManager::new(100, 0);

    memory.reserve(1, 20).unwrap(); // [0, 20)
    memory.reserve(2, 10).unwrap(); // [20, 30)
    memory.reserve(3, 20).unwrap(); // [30, 50)
    memory.reserve(4, 10).unwrap(); // [50, 60)
    memory.reserve(5, 40).unwrap(); // [60, 100)

    // Two identical 20-byte holes at 0 and 30
    memory.release(1);
    memory.release(3);

    assert_eq!(memory.reserve(6, 20).unwrap().start, 0);
    assert_eq!(memory.reserve(7, 20).unwrap().start, 30);
}

#[test]
fn test_translator_reads_live_table() {
    let memory = MemoryManager::new(1024, 64);
    let translator = AddressTranslator::new(memory.clone());

    memory.reserve(1, 200).unwrap();
    assert_eq!(translator.translate(1, VIRT_BASE + 150), Ok(64 + 150));

    memory.release(1);
    assert!(translator.translate(1, VIRT_BASE + 150).is_err());
}

proptest! {
    /// Any interleaving of reservations and releases keeps the space
    /// exactly tiled, and draining every segment coalesces back to a
    /// single hole.
    #[test]
    fn prop_reserve_release_tiles_address_space(
        ops in proptest::collection::vec((1u32..8, 1usize..64), 1..48)
    ) {
        let memory = MemoryManager::new(256, 16);
        let mut live: HashSet<u32> = HashSet::new();

        for (pid, size) in ops {
            if live.contains(&pid) {
                memory.release(pid);
                live.remove(&pid);
            } else if memory.reserve(pid, size).is_ok() {
                live.insert(pid);
            }

            let stats = memory.stats();
            prop_assert_eq!(
                stats.kernel_reserved + stats.used_memory + stats.free_memory,
                stats.total_memory
            );
            prop_assert_eq!(stats.allocated_segments, live.len());
        }

        for pid in live {
            memory.release(pid);
        }
        let stats = memory.stats();
        prop_assert_eq!(stats.hole_count, 1);
        prop_assert_eq!(stats.largest_hole, 240);
    }
}
