//! Session log record module.
//!
//! # Module Structure
//!
//! - `model`: the serde aggregate (`SessionLogRecord` and its parts)
//! - `context`: `SessionContext`, the owning mutator, and `FinalizedRecord`
//! - `summary`: counts-only projection for queryable stores

mod context;
mod model;
mod summary;

pub use context::{FinalizedRecord, SESSION_START_PAGE, SessionContext, SessionStart};
pub use model::{
    ApiCall, ButtonClick, ClientLocation, DocumentKind, ExportedDocument, ExternalService,
    ExternalServiceCall, InteractiveAnswer, Interactions, Outputs, PageView, Performance,
    RagUpdate, RagUpdateKind, SessionLogRecord, SystemEvents, Timing, UserInfo,
};
pub use summary::{
    InteractionCounts, OutputCounts, SessionLogSummary, SummaryPerformance, SummaryTiming,
    SummaryUserInfo,
};
