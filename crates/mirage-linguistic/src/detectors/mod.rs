//! The four linguistic detectors and their orchestration.
//!
//! Each detector runs the same cascade: Tier-1 rule scan, Tier-2
//! structural verification, Tier-3 model verdict. Tier 2 discards
//! candidates the AST refutes, so the surviving candidate set IS the union
//! of verified evidence; when no model is reachable the fallback verdict
//! is synthesized from that set. Disagreements between tiers are never
//! put to a vote — one authority judges on all the evidence.

use mirage_analysis::analyzer::StaticReport;
use mirage_core::types::{DetectorVerdict, LinguisticReport, TierEvidence, VerdictAuthority};
use tracing::{debug, warn};

use crate::similarity::intent_match_score;
use crate::tiers::ast_verifier::AstVerifier;
use crate::tiers::llm_reasoner::{LlmReasoner, LlmVerdict};
use crate::tiers::rule_engine::RuleEngine;
use crate::tiers::{Candidate, Question};

/// Everything the linguistic layer needs for one analysis.
pub struct LinguisticInput<'a> {
    pub prompt: &'a str,
    pub code: &'a str,
    pub report: &'a StaticReport,
}

pub struct LinguisticAnalyzer {
    reasoner: LlmReasoner,
}

impl LinguisticAnalyzer {
    pub fn new(reasoner: LlmReasoner) -> Self {
        Self { reasoner }
    }

    /// Run the four detectors in sequence and compute the intent-match
    /// score. Sequencing is a scheduling choice, not a data dependency.
    pub async fn analyze(&self, input: &LinguisticInput<'_>) -> LinguisticReport {
        let npc = self.run_question(Question::Npc, input).await;
        let prompt_bias = self.run_question(Question::PromptBias, input).await;
        let missing_feature = self.run_question(Question::MissingFeature, input).await;
        let misinterpretation = self.run_question(Question::Misinterpretation, input).await;

        LinguisticReport {
            npc,
            prompt_bias,
            missing_feature,
            misinterpretation,
            intent_match_score: intent_match_score(input.prompt, &input.report.parse),
        }
    }

    async fn run_question(
        &self,
        question: Question,
        input: &LinguisticInput<'_>,
    ) -> DetectorVerdict {
        let tier1 = RuleEngine::scan(question, input.prompt, input.code);
        let tier2 = AstVerifier::verify(question, input.prompt, input.report, &tier1);
        let evidence = TierEvidence {
            tier1: tier1.iter().map(|c| c.message.clone()).collect(),
            tier2: tier2.iter().map(|c| c.message.clone()).collect(),
        };
        debug!(
            question = question.key(),
            tier1 = tier1.len(),
            tier2 = tier2.len(),
            "tier evidence gathered"
        );

        if self.reasoner.enabled() {
            match self
                .reasoner
                .verdict(question, input.prompt, input.code, &tier1, &tier2)
                .await
            {
                Ok(verdict) => return from_llm(verdict, evidence),
                Err(e) => {
                    warn!(question = question.key(), error = %e, "model tier degraded to fallback");
                }
            }
        }
        fallback(&tier1, &tier2, evidence)
    }
}

fn from_llm(verdict: LlmVerdict, evidence: TierEvidence) -> DetectorVerdict {
    DetectorVerdict {
        found: verdict.found,
        count: verdict.issues.len(),
        items: verdict.issues,
        confidence: verdict.confidence.unwrap_or(0.9).clamp(0.0, 1.0),
        severity: verdict.severity.min(10),
        summary: verdict.summary,
        verdict_by: VerdictAuthority::Llm,
        evidence,
    }
}

/// Fallback verdict when no model judgment is available: the verified
/// candidate set decides. Confidence is the maximum across both tiers;
/// severity is Tier-2's when present, else Tier-1's.
fn fallback(tier1: &[Candidate], tier2: &[Candidate], evidence: TierEvidence) -> DetectorVerdict {
    let survivors = tier2;
    if survivors.is_empty() {
        return DetectorVerdict {
            evidence,
            ..DetectorVerdict::empty(VerdictAuthority::Fallback)
        };
    }

    let mut items: Vec<String> = Vec::new();
    for candidate in survivors {
        if !items.contains(&candidate.message) {
            items.push(candidate.message.clone());
        }
    }
    let confidence = tier1
        .iter()
        .chain(survivors.iter())
        .map(|c| c.confidence)
        .fold(0.0f32, f32::max);
    let severity = survivors
        .iter()
        .map(|c| c.severity)
        .max()
        .or_else(|| tier1.iter().map(|c| c.severity).max())
        .unwrap_or(0);
    let summary = items
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");

    DetectorVerdict {
        found: true,
        count: items.len(),
        items,
        confidence,
        severity,
        summary,
        verdict_by: VerdictAuthority::Fallback,
        evidence,
    }
}
