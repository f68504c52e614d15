/*!
 * Address Translator
 * Base+limit virtual-to-physical mapping over the live segment table
 */

use super::manager::MemoryManager;
use super::types::{MemoryError, MemoryResult};
use crate::core::types::{Address, Pid};
use log::debug;

/// Start of every process's virtual view
pub const VIRT_BASE: Address = 0x2000_0000;

/// Address Translator
///
/// Holds a clone of the memory manager so lookups always see the live
/// segment table, never a snapshot.
#[derive(Clone)]
pub struct AddressTranslator {
    memory: MemoryManager,
}

impl AddressTranslator {
    pub fn new(memory: MemoryManager) -> Self {
        Self { memory }
    }

    /// Translate a virtual address for a process
    ///
    /// Faults when the process has no segment, the address lies below the
    /// virtual base, or the offset exceeds the segment limit.
    pub fn translate(&self, pid: Pid, address: Address) -> MemoryResult<Address> {
        let fault = MemoryError::SegmentationFault { pid, address };

        let segment = self.memory.segment(pid).ok_or_else(|| {
            debug!("Translation fault: PID {} has no segment", pid);
            fault.clone()
        })?;

        if address < VIRT_BASE {
            return Err(fault);
        }
        let offset = address - VIRT_BASE;
        if offset >= segment.size {
            debug!(
                "Translation fault: PID {} offset {} exceeds limit {}",
                pid, offset, segment.size
            );
            return Err(fault);
        }

        Ok(segment.start + offset)
    }
}
