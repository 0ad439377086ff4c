//! Query modules, one per relation.

pub mod analyses;
pub mod feedback;
pub mod findings;
pub mod linguistic;
pub mod stage_logs;
pub mod stats;
