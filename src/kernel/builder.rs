/*!
 * Kernel Builder
 * Builder pattern for kernel construction
 */

use super::Kernel;
use crate::memory::{AddressTranslator, MemoryManager};
use crate::process::ProcessTable;
use crate::scheduler::{Policy, Scheduler};
use crate::sync::SyncManager;
use log::info;
use serde::{Deserialize, Serialize};

/// Kernel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Scheduling discipline, fixed for the simulation's duration
    pub policy: Policy,
    /// Total size of the linear address space, in bytes
    pub total_memory: usize,
    /// Permanently unavailable kernel region at the bottom of the space
    pub kernel_reserved: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Fcfs,
            total_memory: 64 * 1024,
            kernel_reserved: 4 * 1024,
        }
    }
}

/// Builder for [`Kernel`]
pub struct KernelBuilder {
    config: KernelConfig,
}

impl KernelBuilder {
    pub fn new() -> Self {
        Self {
            config: KernelConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn with_total_memory(mut self, bytes: usize) -> Self {
        self.config.total_memory = bytes;
        self
    }

    pub fn with_kernel_reserved(mut self, bytes: usize) -> Self {
        self.config.kernel_reserved = bytes;
        self
    }

    /// Build the kernel
    pub fn build(self) -> Kernel {
        let KernelConfig {
            policy,
            total_memory,
            kernel_reserved,
        } = self.config;

        let table = ProcessTable::new();
        let memory = MemoryManager::new(total_memory, kernel_reserved);
        let translator = AddressTranslator::new(memory.clone());
        let scheduler = Scheduler::new(policy, table.clone());
        let sync = SyncManager::new(table.clone());

        info!(
            "Kernel initialized: policy={:?}, memory={} bytes ({} reserved)",
            policy, total_memory, kernel_reserved
        );

        Kernel {
            table,
            memory,
            translator,
            scheduler,
            sync,
        }
    }
}

impl Default for KernelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
