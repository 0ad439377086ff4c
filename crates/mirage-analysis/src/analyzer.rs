//! Static analyzer — parse once, run every detector, aggregate.

use std::panic::{catch_unwind, AssertUnwindSafe};

use mirage_core::errors::ParseError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::detectors::prompt_bias::{self, LiteralCandidate};
use crate::detectors::return_shape::{self, ReturnShapeSignal};
use crate::detectors::{registry, DetectionContext, StaticFinding};
use crate::parser::{parse_python, ParseResult};

/// Aggregated output of the static layer. Owns the parse so the linguistic
/// AST verifier can reuse it without re-parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticReport {
    pub findings: Vec<StaticFinding>,
    pub literal_candidates: Vec<LiteralCandidate>,
    pub return_shape: Option<ReturnShapeSignal>,
    /// `(detector id, error)` for detectors that failed internally.
    pub detector_errors: Vec<(String, String)>,
    pub parse: ParseResult,
}

impl StaticReport {
    pub fn has_syntax_error(&self) -> bool {
        self.parse.has_errors
    }
}

pub struct StaticAnalyzer;

impl StaticAnalyzer {
    /// Run the full static layer over one program.
    ///
    /// Detector failures are swallowed: a detector that panics contributes
    /// nothing and is recorded in `detector_errors`, so one detector's
    /// failure never suppresses the others.
    pub fn analyze(source: &str) -> Result<StaticReport, ParseError> {
        let parse = parse_python(source)?;
        let mut report = StaticReport::default();

        {
            let ctx = DetectionContext::new(source, &parse);

            for detector in registry() {
                let outcome = catch_unwind(AssertUnwindSafe(|| detector.detect(&ctx)));
                match outcome {
                    Ok(findings) => {
                        if !findings.is_empty() {
                            debug!(
                                detector = detector.id(),
                                count = findings.len(),
                                "static detector matched"
                            );
                        }
                        report.findings.extend(findings);
                    }
                    Err(payload) => {
                        let message = panic_message(payload);
                        warn!(detector = detector.id(), error = %message, "static detector failed");
                        report
                            .detector_errors
                            .push((detector.id().to_string(), message));
                    }
                }
            }

            report.literal_candidates = prompt_bias::collect_candidates(&ctx);
            report.return_shape = return_shape::signal(&ctx);
        }

        report.parse = parse;
        Ok(report)
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "detector panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::types::Pattern;

    #[test]
    fn clean_code_produces_no_findings() {
        let report = StaticAnalyzer::analyze("def add(a, b):\n    return a + b\n").unwrap();
        assert!(report.findings.is_empty());
        assert!(report.detector_errors.is_empty());
        assert!(!report.has_syntax_error());
    }

    #[test]
    fn syntax_error_still_runs_other_detectors() {
        // Line 1 is broken; line 3 divides without a guard. The stripped
        // re-parse lets the corner-case detector still see the division.
        let source = "def add(a,b)\n    return a+b\n\ndef divide(a, b):\n    return a / b\n";
        let report = StaticAnalyzer::analyze(source).unwrap();
        assert!(report
            .findings
            .iter()
            .any(|f| f.pattern == Pattern::SyntaxError));
        assert!(report
            .findings
            .iter()
            .any(|f| f.pattern == Pattern::MissingCornerCase));
    }

    #[test]
    fn literal_candidates_and_shape_populated() {
        let report = StaticAnalyzer::analyze("def sort(x):\n    return [1, 2, 3]\n").unwrap();
        assert!(!report.literal_candidates.is_empty());
        let shape = report.return_shape.unwrap();
        assert_eq!(
            shape.category,
            crate::parser::types::ValueCategory::Sequence
        );
    }
}
