//! Persisted question/answer history
//!
//! The whole history is one JSON list stored under a single key. Every
//! operation is a read-modify-write of that value, serialized per store
//! instance so concurrent callers never lose each other's updates.

pub mod error;
pub mod storage;
pub mod store;

pub use error::HistoryError;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::HistoryStore;
