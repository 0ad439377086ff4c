//! Taxonomy classifier — merges static, dynamic, and linguistic signals
//! into a deduplicated finding list.
//!
//! Merge rules, applied in order:
//! 1. syntax errors suppress everything else;
//! 2. a dynamic name-resolution failure confirms a matching static
//!    hallucination (severity max+1 capped at 10, confidence max);
//! 3. dynamic wrong-attribute / wrong-input-type take precedence over
//!    static surface suggestions for the same line;
//! 4. linguistic findings are emitted independently;
//! 5. more than three findings synthesize a composite misinterpretation at
//!    the median severity;
//! 6. deduplicate by (pattern, location), keeping the highest confidence.

use mirage_core::types::{
    DetectionStage, DetectorVerdict, DynamicReport, Finding, LinguisticReport, Pattern,
};

use crate::analyzer::StaticReport;
use crate::detectors::StaticFinding;

/// Produce the final finding list from all three signal sources.
pub fn classify(
    static_report: &StaticReport,
    dynamic: &DynamicReport,
    linguistic: &LinguisticReport,
) -> Vec<Finding> {
    // Rule 1: syntax suppresses all other findings.
    let syntax: Vec<Finding> = static_report
        .findings
        .iter()
        .filter(|f| f.pattern == Pattern::SyntaxError)
        .map(to_static_finding)
        .collect();
    if !syntax.is_empty() {
        return syntax;
    }

    let mut statics: Vec<StaticFinding> = static_report.findings.clone();
    let mut dynamic_consumed = false;

    if let Some(hypothesis) = &dynamic.hypothesis {
        // Rule 3: runtime-only patterns override same-line static surface.
        if matches!(
            hypothesis.pattern,
            Pattern::WrongAttribute | Pattern::WrongInputType
        ) {
            if let Some(line) = hypothesis.line {
                statics.retain(|f| {
                    !(f.pattern == hypothesis.pattern && f.line == Some(line))
                });
            }
        }

        // Rule 2: dynamic confirms static hallucination for the same name.
        if hypothesis.pattern == Pattern::HallucinatedObject {
            if let Some(name) = &hypothesis.unresolved_name {
                if let Some(existing) = statics.iter_mut().find(|f| {
                    f.pattern == Pattern::HallucinatedObject
                        && f.subject.as_deref() == Some(name.as_str())
                }) {
                    existing.severity =
                        existing.severity.max(hypothesis.severity).saturating_add(1).min(10);
                    existing.confidence = existing.confidence.max(0.95);
                    existing.detail = format!(
                        "{}; confirmed at runtime ({})",
                        existing.detail, hypothesis.message
                    );
                    dynamic_consumed = true;
                }
            }
        }

        // A runtime division/boundary failure folds into the static
        // missing-corner-case finding with merged confidence.
        if hypothesis.pattern == Pattern::MissingCornerCase && !dynamic.timed_out {
            if let Some(existing) = statics
                .iter_mut()
                .find(|f| f.pattern == Pattern::MissingCornerCase)
            {
                existing.severity = existing.severity.max(hypothesis.severity);
                existing.confidence = existing.confidence.max(0.9);
                existing.detail = format!(
                    "{}; confirmed at runtime ({}: {})",
                    existing.detail, hypothesis.error_kind, hypothesis.message
                );
                dynamic_consumed = true;
            }
        }
    }

    let mut findings: Vec<Finding> = statics.iter().map(to_static_finding).collect();

    if !dynamic_consumed {
        if let Some(hypothesis) = &dynamic.hypothesis {
            findings.push(Finding {
                pattern: hypothesis.pattern,
                severity: hypothesis.severity,
                confidence: dynamic_confidence(&hypothesis.error_kind),
                description: format!(
                    "{} at runtime: {}",
                    hypothesis.error_kind, hypothesis.message
                ),
                location: hypothesis.line.map(|l| format!("Line {l}")),
                fix_hint: None,
                detection_stage: DetectionStage::Dynamic,
            });
        }
    }

    // Rule 4: linguistic verdicts, emitted independently.
    push_verdict(
        &mut findings,
        &linguistic.npc,
        Pattern::NonPromptedConsideration,
    );
    push_verdict(&mut findings, &linguistic.prompt_bias, Pattern::PromptBiasedCode);
    // The taxonomy is closed: missing-feature verdicts classify as
    // misinterpretation, with the raw list preserved in the extras.
    push_verdict(
        &mut findings,
        &linguistic.missing_feature,
        Pattern::Misinterpretation,
    );
    push_verdict(
        &mut findings,
        &linguistic.misinterpretation,
        Pattern::Misinterpretation,
    );

    // Rule 5: many findings imply the generator misunderstood the task.
    if findings.len() > 3 {
        let mut severities: Vec<u8> = findings.iter().map(|f| f.severity).collect();
        severities.sort_unstable();
        let median = median_of(&severities);
        let patterns: Vec<&str> = {
            let mut tags: Vec<&str> = findings.iter().map(|f| f.pattern.tag()).collect();
            tags.sort_unstable();
            tags.dedup();
            tags
        };
        findings.push(Finding {
            pattern: Pattern::Misinterpretation,
            severity: median,
            confidence: 0.6,
            description: format!(
                "multiple defect patterns together suggest the task was misunderstood: {}",
                patterns.join(", ")
            ),
            location: None,
            fix_hint: None,
            detection_stage: DetectionStage::Composite,
        });
    }

    dedupe(findings)
}

fn to_static_finding(f: &StaticFinding) -> Finding {
    // Known-noisy heuristic: reversed-operand findings keep a severity
    // floor of 4 so they always land in at least the medium band.
    let severity = if f.kind == "reversed_operands" {
        f.severity.max(4)
    } else {
        f.severity
    };
    Finding {
        pattern: f.pattern,
        severity: severity.min(10),
        confidence: f.confidence.clamp(0.0, 1.0),
        description: f.detail.clone(),
        location: f.line.map(|line| match f.column {
            Some(col) => format!("Line {line}, Column {col}"),
            None => format!("Line {line}"),
        }),
        fix_hint: None,
        detection_stage: DetectionStage::Static,
    }
}

fn dynamic_confidence(error_kind: &str) -> f32 {
    match error_kind {
        "NameError" => 0.95,
        "AttributeError" => 0.9,
        "TypeError" => 0.85,
        "ZeroDivisionError" | "IndexError" | "KeyError" | "ValueError" => 0.85,
        "TimeoutError" => 0.7,
        _ => 0.6,
    }
}

fn push_verdict(findings: &mut Vec<Finding>, verdict: &DetectorVerdict, pattern: Pattern) {
    if !verdict.found {
        return;
    }
    let shown: Vec<&str> = verdict.items.iter().take(3).map(|s| s.as_str()).collect();
    let mut description = if verdict.summary.is_empty() {
        format!("{} issue(s): {}", verdict.count, shown.join(", "))
    } else {
        verdict.summary.clone()
    };
    if verdict.items.len() > 3 {
        description.push_str(&format!(" (+{} more)", verdict.items.len() - 3));
    }
    findings.push(Finding {
        pattern,
        severity: verdict.severity.clamp(1, 10),
        confidence: verdict.confidence.clamp(0.0, 1.0),
        description,
        location: None,
        fix_hint: None,
        detection_stage: DetectionStage::Linguistic,
    });
}

fn median_of(sorted: &[u8]) -> u8 {
    if sorted.is_empty() {
        return 0;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        ((sorted[mid - 1] as u16 + sorted[mid] as u16) / 2) as u8
    }
}

/// Rule 6: deduplicate by (pattern, location); within a group keep the
/// highest-confidence entry and merge the descriptions.
fn dedupe(findings: Vec<Finding>) -> Vec<Finding> {
    let mut out: Vec<Finding> = Vec::with_capacity(findings.len());
    for finding in findings {
        let duplicate = out.iter_mut().find(|existing| {
            existing.pattern == finding.pattern && existing.location == finding.location
        });
        match duplicate {
            Some(existing) => {
                if !existing.description.contains(&finding.description) {
                    existing.description =
                        format!("{}; {}", existing.description, finding.description);
                }
                if finding.confidence > existing.confidence {
                    existing.confidence = finding.confidence;
                    existing.severity = finding.severity;
                    existing.detection_stage = finding.detection_stage;
                }
            }
            None => out.push(finding),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::types::{RuntimeHypothesis, TierEvidence, VerdictAuthority};

    use crate::analyzer::StaticAnalyzer;

    fn verdict(found: bool, items: Vec<&str>, severity: u8, confidence: f32) -> DetectorVerdict {
        DetectorVerdict {
            found,
            items: items.into_iter().map(String::from).collect(),
            count: 0,
            confidence,
            severity,
            summary: String::new(),
            verdict_by: VerdictAuthority::Fallback,
            evidence: TierEvidence::default(),
        }
    }

    fn quiet_linguistic() -> LinguisticReport {
        LinguisticReport::pending()
    }

    #[test]
    fn syntax_suppresses_everything() {
        let report = StaticAnalyzer::analyze("def add(a,b)\n    return a+b\n").unwrap();
        let mut linguistic = quiet_linguistic();
        linguistic.npc = verdict(true, vec!["logging"], 5, 0.8);
        let findings = classify(&report, &DynamicReport::default(), &linguistic);
        assert!(!findings.is_empty());
        assert!(findings.iter().all(|f| f.pattern == Pattern::SyntaxError));
    }

    #[test]
    fn dynamic_confirms_static_hallucination() {
        let report =
            StaticAnalyzer::analyze("def f(n):\n    return calc.factorial(n)\n").unwrap();
        let static_severity = report
            .findings
            .iter()
            .find(|f| f.pattern == Pattern::HallucinatedObject)
            .unwrap()
            .severity;

        let dynamic = DynamicReport {
            executed: true,
            skipped_reason: None,
            success: false,
            timed_out: false,
            parse_error: false,
            hypothesis: Some(RuntimeHypothesis {
                pattern: Pattern::HallucinatedObject,
                severity: 8,
                error_kind: "NameError".to_string(),
                message: "name 'calc' is not defined".to_string(),
                line: Some(2),
                unresolved_name: Some("calc".to_string()),
            }),
        };
        let findings = classify(&report, &dynamic, &quiet_linguistic());
        let hallucinations: Vec<_> = findings
            .iter()
            .filter(|f| f.pattern == Pattern::HallucinatedObject)
            .collect();
        assert_eq!(hallucinations.len(), 1, "confirmed finding must merge");
        assert_eq!(
            hallucinations[0].severity,
            static_severity.max(8).saturating_add(1).min(10)
        );
        assert!(hallucinations[0].confidence >= 0.95);
    }

    #[test]
    fn division_by_zero_merges_confidence() {
        let report = StaticAnalyzer::analyze("def divide(a, b):\n    return a / b\n").unwrap();
        let dynamic = DynamicReport {
            executed: true,
            skipped_reason: None,
            success: false,
            timed_out: false,
            parse_error: false,
            hypothesis: Some(RuntimeHypothesis {
                pattern: Pattern::MissingCornerCase,
                severity: 5,
                error_kind: "ZeroDivisionError".to_string(),
                message: "division by zero".to_string(),
                line: Some(2),
                unresolved_name: None,
            }),
        };
        let findings = classify(&report, &dynamic, &quiet_linguistic());
        let corner: Vec<_> = findings
            .iter()
            .filter(|f| f.pattern == Pattern::MissingCornerCase)
            .collect();
        assert_eq!(corner.len(), 1, "one merged missing_corner_case finding");
        assert!(corner[0].confidence >= 0.9);
        assert_eq!(corner[0].location.as_deref(), Some("Line 2"));
    }

    #[test]
    fn linguistic_findings_do_not_suppress_static() {
        let report = StaticAnalyzer::analyze("def divide(a, b):\n    return a / b\n").unwrap();
        let mut linguistic = quiet_linguistic();
        linguistic.misinterpretation = verdict(true, vec!["returns sum instead of average"], 7, 0.8);
        let findings = classify(&report, &DynamicReport::default(), &linguistic);
        assert!(findings
            .iter()
            .any(|f| f.pattern == Pattern::MissingCornerCase));
        assert!(findings
            .iter()
            .any(|f| f.pattern == Pattern::Misinterpretation));
    }

    #[test]
    fn composite_added_above_three_findings() {
        // Two static findings (unguarded division, wrong input type) plus
        // two linguistic verdicts cross the threshold of three.
        let report = StaticAnalyzer::analyze(
            "def divide(a, b):\n    return a / b\n\nx = int(\"forty\")\n",
        )
        .unwrap();
        let mut linguistic = quiet_linguistic();
        linguistic.npc = verdict(true, vec!["logging"], 5, 0.8);
        linguistic.prompt_bias = verdict(true, vec!["42"], 6, 0.8);
        let findings = classify(&report, &DynamicReport::default(), &linguistic);
        let composite: Vec<_> = findings
            .iter()
            .filter(|f| f.detection_stage == DetectionStage::Composite)
            .collect();
        assert_eq!(composite.len(), 1);
        assert_eq!(composite[0].pattern, Pattern::Misinterpretation);
        assert!(composite[0].description.contains("missing_corner_case"));
    }

    #[test]
    fn composite_merges_with_same_location_misinterpretation() {
        // When a linguistic misinterpretation already exists at the same
        // (pattern, location) key, rule 6 collapses the composite into it.
        let report = StaticAnalyzer::analyze("def divide(a, b):\n    return a / b\n").unwrap();
        let mut linguistic = quiet_linguistic();
        linguistic.npc = verdict(true, vec!["logging"], 5, 0.8);
        linguistic.prompt_bias = verdict(true, vec!["42"], 6, 0.8);
        linguistic.misinterpretation = verdict(true, vec!["wrong algorithm"], 7, 0.8);
        let findings = classify(&report, &DynamicReport::default(), &linguistic);
        let misinterpretations: Vec<_> = findings
            .iter()
            .filter(|f| f.pattern == Pattern::Misinterpretation)
            .collect();
        assert_eq!(misinterpretations.len(), 1);
    }

    #[test]
    fn empty_inputs_produce_no_findings() {
        let report = StaticAnalyzer::analyze("").unwrap();
        let findings = classify(&report, &DynamicReport::default(), &quiet_linguistic());
        assert!(findings.is_empty());
    }
}
