//! Static detector system — nine detectors over one shared parse.
//!
//! Seven detectors emit findings through the [`StaticDetector`] trait. Two
//! are surface collectors: `prompt_bias` gathers candidate literals for the
//! linguistic layer, and `return_shape` derives the return-category signal.

pub mod builtins;
pub mod corner_case;
pub mod hallucination;
pub mod incomplete;
pub mod prompt_bias;
pub mod return_shape;
pub mod silly_mistake;
pub mod syntax;
pub mod wrong_attribute;
pub mod wrong_input_type;

use mirage_core::types::Pattern;
use serde::{Deserialize, Serialize};

use crate::parser::ParseResult;

/// Everything a detector may inspect. Built once per analysis.
pub struct DetectionContext<'a> {
    pub source: &'a str,
    pub lines: Vec<&'a str>,
    pub parse: &'a ParseResult,
}

impl<'a> DetectionContext<'a> {
    pub fn new(source: &'a str, parse: &'a ParseResult) -> Self {
        Self {
            source,
            lines: source.lines().collect(),
            parse,
        }
    }
}

/// A raw match from one static detector, before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticFinding {
    pub pattern: Pattern,
    pub severity: u8,
    pub confidence: f32,
    /// Machine-ish sub-kind (e.g. "reversed_operands", "pass_only").
    pub kind: String,
    pub detail: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    /// Identifier or value the finding is about, when one exists.
    pub subject: Option<String>,
}

/// Trait every finding-emitting static detector implements.
pub trait StaticDetector: Send + Sync {
    /// Unique identifier for this detector.
    fn id(&self) -> &'static str;

    /// The taxonomy pattern this detector reports.
    fn pattern(&self) -> Pattern;

    /// Run detection on the given context.
    fn detect(&self, ctx: &DetectionContext) -> Vec<StaticFinding>;
}

/// All finding-emitting detectors, in execution order. Syntax runs first so
/// the analyzer can observe rule 1 (syntax suppresses everything) early.
pub fn registry() -> Vec<Box<dyn StaticDetector>> {
    vec![
        Box::new(syntax::SyntaxDetector),
        Box::new(hallucination::HallucinationDetector),
        Box::new(incomplete::IncompleteDetector),
        Box::new(silly_mistake::SillyMistakeDetector),
        Box::new(wrong_attribute::WrongAttributeDetector),
        Box::new(wrong_input_type::WrongInputTypeDetector),
        Box::new(corner_case::CornerCaseDetector),
    ]
}
