//! Application layer for brandlog.
//!
//! Coordinates the core types and infrastructure sinks: fan-out of
//! finalized session logs, the session lifecycle service and analysis
//! steps with fallbacks.

pub mod analysis;
pub mod fan_out;
pub mod session;

pub use analysis::AnalysisStep;
pub use fan_out::FanOutCoordinator;
pub use session::SessionLogService;
