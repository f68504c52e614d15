/*!
 * Error Types
 * Centralized error handling with thiserror
 */

// Re-export MemoryError from memory module
pub use crate::memory::MemoryError;

// Re-export ProcessError from process module
pub use crate::process::ProcessError;

// Re-export SyncError from sync module
pub use crate::sync::SyncError;
