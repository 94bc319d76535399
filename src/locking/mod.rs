//! Working-directory locking against concurrent runs.

mod file_lock;

pub use file_lock::{WorkDirLock, cleanup_all_locks};
