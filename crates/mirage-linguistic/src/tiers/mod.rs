//! The three-tier evidence stack shared by the four detectors.

pub mod ast_verifier;
pub mod llm_reasoner;
pub mod rule_engine;

/// The four semantic questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Npc,
    PromptBias,
    MissingFeature,
    Misinterpretation,
}

impl Question {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Npc => "npc",
            Self::PromptBias => "prompt_bias",
            Self::MissingFeature => "missing_feature",
            Self::Misinterpretation => "misinterpretation",
        }
    }

    /// The question posed explicitly to the verdict authority.
    pub fn question_text(&self) -> &'static str {
        match self {
            Self::Npc => {
                "Does the code include features or behavior that the prompt did not ask for \
                 (debug output, logging, validation, error handling, authorization, caching, \
                 sorting)? Report only truly unrequested additions."
            }
            Self::PromptBias => {
                "Does the code hardcode example values from the prompt (quoted strings, \
                 numeric examples, sequence examples) in the code paths that decide output, \
                 instead of implementing the general algorithm?"
            }
            Self::MissingFeature => {
                "Which features explicitly requested in the prompt (actions, data types, \
                 return values) are missing from the code? Be conservative: only report \
                 items the prompt clearly asked for."
            }
            Self::Misinterpretation => {
                "Does the code solve a fundamentally different problem than the prompt \
                 requested (wrong return shape, printing instead of returning, missing \
                 selection logic, wrong algorithm)?"
            }
        }
    }

    /// Severity seed used by Tier-1 candidates for this question.
    pub fn base_severity(&self) -> u8 {
        match self {
            Self::Npc => 5,
            Self::PromptBias => 6,
            Self::MissingFeature => 6,
            Self::Misinterpretation => 7,
        }
    }
}

/// One piece of evidence from Tier 1 or Tier 2. Candidates are never
/// aggregated by vote; they are passed forward for a single judgment.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub kind: &'static str,
    /// The concrete value or feature the evidence is about.
    pub value: String,
    pub message: String,
    pub confidence: f32,
    pub severity: u8,
}
