//! Storage layer for atomic file operations.

mod atomic_json;
mod kv_store;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use kv_store::JsonKeyValueStore;
