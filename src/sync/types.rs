/*!
 * Synchronization Types
 * Errors for semaphore and mutex operations
 */

use crate::core::types::{Pid, SyncId};
use thiserror::Error;

/// Synchronization operation result
pub type SyncResult<T> = Result<T, SyncError>;

/// Synchronization errors
///
/// All of these are caller-contract violations: the external driver
/// guarantees ids are registered and unlocks come from the owner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("semaphore {0} is not registered")]
    UnknownSemaphore(SyncId),

    #[error("mutex {0} is not registered")]
    UnknownMutex(SyncId),

    #[error("primitive {0} is already registered")]
    AlreadyRegistered(SyncId),

    #[error("mutex {id} is not owned by PID {pid}")]
    NotOwner { id: SyncId, pid: Pid },
}
