//! Store double whose reads or writes fail, for exercising backend error paths.

use futures::future::BoxFuture;

use crate::dao::{
    kv_store::{KeyValueStore, MemoryKvStore},
    storage::{StorageError, StorageResult},
};

/// Wraps a [`MemoryKvStore`] and fails the selected operations with an IO error.
#[derive(Debug, Clone, Default)]
pub struct FailingKvStore {
    inner: MemoryKvStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl FailingKvStore {
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

fn offline() -> StorageError {
    let err = std::io::Error::other("disk offline");
    StorageError::unavailable(err.to_string(), err)
}

impl KeyValueStore for FailingKvStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        if self.fail_reads {
            return Box::pin(async { Err(offline()) });
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        if self.fail_writes {
            return Box::pin(async { Err(offline()) });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>> {
        if self.fail_writes {
            return Box::pin(async { Err(offline()) });
        }
        self.inner.remove(key)
    }
}
