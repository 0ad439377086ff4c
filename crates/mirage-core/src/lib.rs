//! Mirage core — shared types, errors, configuration, and tracing setup.
//!
//! Everything that crosses a crate boundary is defined here once. The
//! analysis, dynamic, linguistic, storage, and server crates all consume
//! these types; nothing redefines them.

pub mod config;
pub mod errors;
pub mod tracing_setup;
pub mod types;

pub use config::MirageConfig;
pub use types::{
    AnalysisRecord, AnalysisStatus, DetectionStage, Finding, LinguisticExtras, Pattern, StageLog,
};
