//! Infrastructure layer for brandlog.
//!
//! Concrete sinks (local store, remote document store, notification
//! channel), the file-backed failure queue and configuration loading.

pub mod config_service;
pub mod failure_queue;
mod http;
pub mod local_log_store;
pub mod notification_channel;
pub mod paths;
pub mod remote_document_store;
pub mod storage;

pub use config_service::ConfigService;
pub use failure_queue::LocalFailureQueue;
pub use local_log_store::LocalLogStore;
pub use notification_channel::NotificationChannel;
pub use paths::BrandlogPaths;
pub use remote_document_store::RemoteDocumentStore;
pub use storage::JsonKeyValueStore;
