//! Canonical data model.
//!
//! This is the single source of truth for the analysis output types. Every
//! downstream system consumes these structs; nothing else redefines them.

pub mod pattern;
pub mod record;
pub mod report;

pub use pattern::{severity_label, DetectionStage, Pattern};
pub use record::{AnalysisRecord, AnalysisStatus, Finding, LinguisticExtras, StageLog};
pub use report::{
    DetectorVerdict, DynamicReport, LinguisticReport, RuntimeHypothesis, TierEvidence,
    VerdictAuthority,
};
