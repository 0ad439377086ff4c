//! Mirage linguistic layer — prompt-vs-code semantic comparison.
//!
//! Four detectors (NPC, prompt-bias, missing-feature, misinterpretation),
//! each a three-tier cascade: a regex rule engine, a structural verifier
//! over the shared parse, and an external-model verdict with a
//! deterministic fallback. Tiers one and two are evidence producers only;
//! the model (or the fallback rule) is the single verdict authority.

pub mod detectors;
pub mod keywords;
pub mod similarity;
pub mod tiers;

pub use detectors::{LinguisticAnalyzer, LinguisticInput};
pub use tiers::llm_reasoner::LlmReasoner;
