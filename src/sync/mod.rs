/*!
 * Synchronization Primitives
 * Semaphores and mutexes for simulated processes
 */

mod manager;
mod mutex;
mod semaphore;
mod types;

pub use manager::SyncManager;
pub use mutex::Mutex;
pub use semaphore::Semaphore;
pub use types::{SyncError, SyncResult};
