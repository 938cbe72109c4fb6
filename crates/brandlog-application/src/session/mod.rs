//! Session lifecycle services.
//!
//! Starting a session hands out a `SessionContext`; ending it finalizes
//! the record and fans it out through the coordinator.

mod service;

pub use service::SessionLogService;
