/// Board persistence on top of a key-value store.
pub mod board;
/// Key-value store abstraction and its backends.
pub mod kv_store;
/// Persisted model definitions.
pub mod models;
/// Storage error types shared by every backend.
pub mod storage;
