//! Explainer — human-readable descriptions, severity labels, fix hints,
//! and the per-record summary paragraph.

use mirage_core::types::{severity_label, Finding, Pattern};

/// Pattern-keyed remediation template.
pub fn fix_hint(pattern: Pattern) -> &'static str {
    match pattern {
        Pattern::SyntaxError => {
            "Review the syntax at the indicated location. Common issues include missing \
             colons, unmatched parentheses, or incorrect indentation."
        }
        Pattern::HallucinatedObject => {
            "Verify the referenced name exists in the imported modules or define it before \
             use. Check the official documentation for the correct API."
        }
        Pattern::IncompleteGeneration => {
            "Complete the missing logic based on the function's intended purpose."
        }
        Pattern::SillyMistake => {
            "Review the logic flow. Common issues: reversed operands, redundant conditions, \
             or identical branches."
        }
        Pattern::WrongAttribute => {
            "Check the object's available attributes or use dictionary access syntax \
             (item[\"key\"]) for keyed mappings."
        }
        Pattern::WrongInputType => {
            "Verify the expected input types for the function and convert or validate \
             values before the call."
        }
        Pattern::NonPromptedConsideration => {
            "Remove the unrequested features unless they are actually needed for your use \
             case."
        }
        Pattern::PromptBiasedCode => {
            "Replace hardcoded example values with general-purpose logic that works for all \
             inputs."
        }
        Pattern::MissingCornerCase => {
            "Add validation for edge cases: None inputs, empty collections, zero divisors, \
             and boundary conditions."
        }
        Pattern::Misinterpretation => {
            "Compare the prompt with the generated code's approach; the fundamental logic \
             may need to be rewritten."
        }
    }
}

/// Short description template used when a finding carries no detail.
pub fn pattern_blurb(pattern: Pattern) -> &'static str {
    match pattern {
        Pattern::SyntaxError => "the code cannot be parsed",
        Pattern::HallucinatedObject => "the code references a name that does not exist",
        Pattern::IncompleteGeneration => "the generation appears to have been cut off",
        Pattern::SillyMistake => "a structurally non-human pattern was detected",
        Pattern::WrongAttribute => "an attribute is accessed that the object does not have",
        Pattern::WrongInputType => "a value of an incompatible type is passed",
        Pattern::NonPromptedConsideration => "the code includes features the prompt did not ask for",
        Pattern::PromptBiasedCode => "example values from the prompt are hardcoded",
        Pattern::MissingCornerCase => "a boundary input is not guarded",
        Pattern::Misinterpretation => "the code solves a different problem than requested",
    }
}

/// Fill in fix hints and backstop empty descriptions.
pub fn embellish(findings: &mut [Finding]) {
    for finding in findings.iter_mut() {
        if finding.fix_hint.is_none() {
            finding.fix_hint = Some(fix_hint(finding.pattern).to_string());
        }
        if finding.description.is_empty() {
            finding.description = pattern_blurb(finding.pattern).to_string();
        }
    }
}

/// Single-paragraph summary for the analysis record.
pub fn generate_summary(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No defects were detected by static, dynamic, or linguistic analysis. Logic \
                errors may still exist; test the code against representative inputs."
            .to_string();
    }

    let worst = findings
        .iter()
        .max_by_key(|f| f.severity)
        .expect("non-empty findings");
    let mut tags: Vec<&str> = findings.iter().map(|f| f.pattern.tag()).collect();
    tags.sort_unstable();
    tags.dedup();

    format!(
        "Detected {} issue(s) across {} pattern(s): {}. Most severe: {} ({} severity {}/10). {}",
        findings.len(),
        tags.len(),
        tags.join(", "),
        worst.pattern.display_name(),
        severity_label(worst.severity),
        worst.severity,
        worst.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::types::DetectionStage;

    fn finding(pattern: Pattern, severity: u8) -> Finding {
        Finding {
            pattern,
            severity,
            confidence: 0.8,
            description: "division by 'b' with no zero check".to_string(),
            location: Some("Line 2".to_string()),
            fix_hint: None,
            detection_stage: DetectionStage::Static,
        }
    }

    #[test]
    fn embellish_fills_fix_hints() {
        let mut findings = vec![finding(Pattern::MissingCornerCase, 5)];
        embellish(&mut findings);
        assert!(findings[0].fix_hint.as_deref().unwrap().contains("edge cases"));
    }

    #[test]
    fn summary_names_worst_finding() {
        let findings = vec![
            finding(Pattern::MissingCornerCase, 5),
            finding(Pattern::HallucinatedObject, 9),
        ];
        let summary = generate_summary(&findings);
        assert!(summary.contains("Hallucinated Object"));
        assert!(summary.contains("critical"));
        assert!(summary.contains("2 issue(s)"));
    }

    #[test]
    fn empty_summary_mentions_clean_result() {
        let summary = generate_summary(&[]);
        assert!(summary.contains("No defects"));
    }
}
