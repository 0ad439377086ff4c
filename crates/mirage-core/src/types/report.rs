//! Inter-stage report types.
//!
//! The dynamic and linguistic layers produce these; the taxonomy classifier
//! consumes them together with the static report. Detectors set `pattern`
//! themselves — the classifier never re-derives it.

use serde::{Deserialize, Serialize};

use super::pattern::Pattern;

/// Sparse result of the dynamic layer: at most one runtime hypothesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynamicReport {
    /// Whether the sandbox actually ran the program.
    pub executed: bool,
    /// Set when the layer degraded to a skip (deny-set hit, backend disabled).
    pub skipped_reason: Option<String>,
    /// User code ran to completion without an uncaught exception.
    pub success: bool,
    pub timed_out: bool,
    /// No harness JSON could be found in the captured stdout.
    pub parse_error: bool,
    pub hypothesis: Option<RuntimeHypothesis>,
}

impl DynamicReport {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            executed: false,
            skipped_reason: Some(reason.into()),
            ..Default::default()
        }
    }
}

/// A runtime failure mapped to a pattern hypothesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeHypothesis {
    pub pattern: Pattern,
    pub severity: u8,
    /// Exception kind as reported by the harness (e.g. "NameError").
    pub error_kind: String,
    pub message: String,
    pub line: Option<u32>,
    /// Unresolved identifier, when the kind is a name-resolution failure.
    pub unresolved_name: Option<String>,
}

/// Who issued the final verdict for a linguistic detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictAuthority {
    Llm,
    Fallback,
}

/// Evidence gathered by the first two tiers, passed forward verbatim.
/// Tiers do not vote: the verdict authority judges on all of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierEvidence {
    pub tier1: Vec<String>,
    pub tier2: Vec<String>,
}

/// The shared verdict shape all four linguistic detectors produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorVerdict {
    pub found: bool,
    /// issues / features / values / reasons, depending on the question.
    pub items: Vec<String>,
    pub count: usize,
    pub confidence: f32,
    pub severity: u8,
    pub summary: String,
    pub verdict_by: VerdictAuthority,
    pub evidence: TierEvidence,
}

impl DetectorVerdict {
    /// The no-finding verdict used when a detector has nothing to say.
    pub fn empty(verdict_by: VerdictAuthority) -> Self {
        Self {
            found: false,
            items: Vec::new(),
            count: 0,
            confidence: 0.0,
            severity: 0,
            summary: String::new(),
            verdict_by,
            evidence: TierEvidence::default(),
        }
    }
}

/// Combined output of the four linguistic detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinguisticReport {
    pub npc: DetectorVerdict,
    pub prompt_bias: DetectorVerdict,
    pub missing_feature: DetectorVerdict,
    pub misinterpretation: DetectorVerdict,
    /// TF-IDF cosine between prompt tokens and code identifier tokens.
    pub intent_match_score: f32,
}

impl LinguisticReport {
    /// The all-empty report used for the provisional classifier pass in
    /// Phase A, before the background task has run.
    pub fn pending() -> Self {
        Self {
            npc: DetectorVerdict::empty(VerdictAuthority::Fallback),
            prompt_bias: DetectorVerdict::empty(VerdictAuthority::Fallback),
            missing_feature: DetectorVerdict::empty(VerdictAuthority::Fallback),
            misinterpretation: DetectorVerdict::empty(VerdictAuthority::Fallback),
            intent_match_score: 0.0,
        }
    }
}
