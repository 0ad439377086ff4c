//! Finding and analysis-record aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pattern::{DetectionStage, Pattern};

/// A single classified defect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub pattern: Pattern,
    /// 0–10. Bands: critical ≥ 8, high 6–7, medium 4–5, low 1–3.
    pub severity: u8,
    /// 0.0–1.0.
    pub confidence: f32,
    pub description: String,
    /// Optional "Line N" (or "Line N, Column M") anchor.
    pub location: Option<String>,
    pub fix_hint: Option<String>,
    pub detection_stage: DetectionStage,
}

impl Finding {
    /// Clamp severity and confidence into their documented ranges.
    pub fn clamped(mut self) -> Self {
        self.severity = self.severity.min(10);
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self
    }
}

/// Lifecycle status of an analysis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Processing,
    Complete,
}

impl AnalysisStatus {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Complete => "complete",
        }
    }

    pub fn from_tag(tag: &str) -> Option<AnalysisStatus> {
        match tag {
            "processing" => Some(Self::Processing),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

/// Timing and outcome of one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageLog {
    /// "static" | "dynamic" | "linguistic" | "classifier".
    pub stage: String,
    pub success: bool,
    pub error: Option<String>,
    pub elapsed_seconds: f64,
}

impl StageLog {
    pub fn ok(stage: &str, elapsed_seconds: f64) -> Self {
        Self {
            stage: stage.to_string(),
            success: true,
            error: None,
            elapsed_seconds,
        }
    }

    pub fn failed(stage: &str, error: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            stage: stage.to_string(),
            success: false,
            error: Some(error.into()),
            elapsed_seconds,
        }
    }
}

/// Structured dump of the four linguistic detectors, reported alongside the
/// findings. The intent-match score is auxiliary — not itself a finding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinguisticExtras {
    pub intent_match_score: f32,
    pub unprompted_features: Vec<String>,
    pub missing_features: Vec<String>,
    pub hardcoded_values: Vec<String>,
}

/// The persistent aggregate for one `(prompt, code)` submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub prompt: String,
    pub code: String,
    /// Language tag of the target source under study.
    pub language: String,
    pub status: AnalysisStatus,
    pub has_bugs: bool,
    /// Maximum severity across findings, 0 when findings is empty.
    pub overall_severity: u8,
    /// Mean finding confidence, 0.0 when findings is empty.
    pub confidence: f32,
    pub summary: String,
    pub findings: Vec<Finding>,
    pub stage_logs: Vec<StageLog>,
    pub linguistic_extras: Option<LinguisticExtras>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Recompute the derived fields from the finding list, upholding
    /// `has_bugs ⇔ findings ≠ ∅` and `overall_severity = max(severity)`.
    pub fn recompute_derived(&mut self) {
        self.has_bugs = !self.findings.is_empty();
        self.overall_severity = self.findings.iter().map(|f| f.severity).max().unwrap_or(0);
        self.confidence = if self.findings.is_empty() {
            0.0
        } else {
            self.findings.iter().map(|f| f.confidence).sum::<f32>() / self.findings.len() as f32
        };
    }
}
