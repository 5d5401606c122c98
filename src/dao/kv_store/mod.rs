#[cfg(test)]
pub mod failing;
/// One-file-per-key backend.
pub mod file;
/// In-process backend.
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

pub use self::{file::FileKvStore, memory::MemoryKvStore};

/// Durable key-value store holding opaque serialized documents.
///
/// A `set` replaces the whole value; readers observe either the previous value or the
/// new one, never a partial write.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` when the key was never written.
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Replace the value under `key` atomically.
    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>>;
}
