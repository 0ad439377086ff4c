//! The ten-pattern defect taxonomy.
//!
//! The tag strings are a stable output contract. The enum is a closed sum:
//! persistence boundaries reject anything `from_tag` does not recognize.

use serde::{Deserialize, Serialize};

/// One of the ten canonical LLM failure-mode patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    SyntaxError,
    HallucinatedObject,
    IncompleteGeneration,
    SillyMistake,
    WrongAttribute,
    WrongInputType,
    NonPromptedConsideration,
    PromptBiasedCode,
    MissingCornerCase,
    Misinterpretation,
}

impl Pattern {
    pub fn all() -> &'static [Pattern] {
        &[
            Self::SyntaxError,
            Self::HallucinatedObject,
            Self::IncompleteGeneration,
            Self::SillyMistake,
            Self::WrongAttribute,
            Self::WrongInputType,
            Self::NonPromptedConsideration,
            Self::PromptBiasedCode,
            Self::MissingCornerCase,
            Self::Misinterpretation,
        ]
    }

    /// The canonical wire/storage tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SyntaxError => "syntax_error",
            Self::HallucinatedObject => "hallucinated_object",
            Self::IncompleteGeneration => "incomplete_generation",
            Self::SillyMistake => "silly_mistake",
            Self::WrongAttribute => "wrong_attribute",
            Self::WrongInputType => "wrong_input_type",
            Self::NonPromptedConsideration => "non_prompted_consideration",
            Self::PromptBiasedCode => "prompt_biased_code",
            Self::MissingCornerCase => "missing_corner_case",
            Self::Misinterpretation => "misinterpretation",
        }
    }

    /// Parse a stored tag. Unknown tags are a contract violation and return
    /// `None` so the persistence layer can refuse them.
    pub fn from_tag(tag: &str) -> Option<Pattern> {
        Pattern::all().iter().copied().find(|p| p.tag() == tag)
    }

    /// Human-facing name used by the explainer.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SyntaxError => "Syntax Error",
            Self::HallucinatedObject => "Hallucinated Object",
            Self::IncompleteGeneration => "Incomplete Generation",
            Self::SillyMistake => "Silly Mistake",
            Self::WrongAttribute => "Wrong Attribute",
            Self::WrongInputType => "Wrong Input Type",
            Self::NonPromptedConsideration => "Non-Prompted Consideration (NPC)",
            Self::PromptBiasedCode => "Prompt-Biased Code",
            Self::MissingCornerCase => "Missing Corner Case",
            Self::Misinterpretation => "Misinterpretation",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which stage of the pipeline produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStage {
    Static,
    Dynamic,
    Linguistic,
    /// Only the classifier synthesizes composite findings.
    Composite,
}

impl DetectionStage {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Linguistic => "linguistic",
            Self::Composite => "composite",
        }
    }

    pub fn from_tag(tag: &str) -> Option<DetectionStage> {
        match tag {
            "static" => Some(Self::Static),
            "dynamic" => Some(Self::Dynamic),
            "linguistic" => Some(Self::Linguistic),
            "composite" => Some(Self::Composite),
            _ => None,
        }
    }
}

/// Severity band label for a 0–10 severity score.
///
/// Bands: critical ≥ 8, high 6–7, medium 4–5, low 1–3, none 0.
pub fn severity_label(severity: u8) -> &'static str {
    match severity {
        8..=u8::MAX => "critical",
        6..=7 => "high",
        4..=5 => "medium",
        1..=3 => "low",
        0 => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for p in Pattern::all() {
            assert_eq!(Pattern::from_tag(p.tag()), Some(*p));
        }
    }

    #[test]
    fn unknown_tag_rejected() {
        assert_eq!(Pattern::from_tag("missing_feature"), None);
        assert_eq!(Pattern::from_tag("No Bugs Detected"), None);
        assert_eq!(Pattern::from_tag(""), None);
    }

    #[test]
    fn serde_uses_canonical_tags() {
        let json = serde_json::to_string(&Pattern::PromptBiasedCode).unwrap();
        assert_eq!(json, "\"prompt_biased_code\"");
        let back: Pattern = serde_json::from_str("\"non_prompted_consideration\"").unwrap();
        assert_eq!(back, Pattern::NonPromptedConsideration);
    }

    #[test]
    fn severity_bands() {
        assert_eq!(severity_label(10), "critical");
        assert_eq!(severity_label(8), "critical");
        assert_eq!(severity_label(7), "high");
        assert_eq!(severity_label(6), "high");
        assert_eq!(severity_label(5), "medium");
        assert_eq!(severity_label(4), "medium");
        assert_eq!(severity_label(3), "low");
        assert_eq!(severity_label(1), "low");
        assert_eq!(severity_label(0), "none");
    }
}
