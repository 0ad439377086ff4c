//! Property tests: the static layer and classifier hold their invariants
//! on arbitrary input.

use mirage_analysis::analyzer::StaticAnalyzer;
use mirage_analysis::taxonomy::classifier;
use mirage_core::types::{DynamicReport, LinguisticReport, Pattern};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The analyzer never panics and never emits out-of-range scores,
    /// whatever bytes arrive as "code".
    #[test]
    fn analyzer_is_total(code in "\\PC{0,400}") {
        let report = StaticAnalyzer::analyze(&code).unwrap();
        for finding in &report.findings {
            prop_assert!(finding.severity <= 10);
            prop_assert!((0.0..=1.0).contains(&finding.confidence));
        }
    }

    /// Classification of any parseable-or-not input keeps severity and
    /// confidence bounds and the syntax-suppression rule.
    #[test]
    fn classifier_bounds_hold(code in "\\PC{0,400}") {
        let report = StaticAnalyzer::analyze(&code).unwrap();
        let findings = classifier::classify(
            &report,
            &DynamicReport::default(),
            &LinguisticReport::pending(),
        );
        let has_syntax = findings.iter().any(|f| f.pattern == Pattern::SyntaxError);
        for finding in &findings {
            prop_assert!(finding.severity <= 10);
            prop_assert!((0.0..=1.0).contains(&finding.confidence));
            if has_syntax {
                prop_assert_eq!(finding.pattern, Pattern::SyntaxError);
            }
        }
    }

    /// A read of any whitelisted builtin is never a hallucination.
    #[test]
    fn builtin_reads_never_flagged(idx in 0usize..60) {
        let name = mirage_analysis::detectors::builtins::BUILTINS[idx];
        let code = format!("value = {name}\n");
        let report = StaticAnalyzer::analyze(&code).unwrap();
        prop_assert!(
            !report
                .findings
                .iter()
                .any(|f| f.pattern == Pattern::HallucinatedObject),
            "builtin {} was flagged", name
        );
    }
}
