//! Wrong-input-type detector — string literals fed to numeric functions.

use mirage_core::types::Pattern;

use super::{DetectionContext, StaticDetector, StaticFinding};

/// Known numeric/math functions.
const NUMERIC_FUNCTIONS: &[&str] = &[
    "sqrt", "pow", "log", "log2", "log10", "exp", "sin", "cos", "tan", "ceil", "floor", "round",
    "abs", "int", "float",
];

pub struct WrongInputTypeDetector;

impl StaticDetector for WrongInputTypeDetector {
    fn id(&self) -> &'static str {
        "wrong-input-type"
    }

    fn pattern(&self) -> Pattern {
        Pattern::WrongInputType
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<StaticFinding> {
        let mut findings = Vec::new();

        for call in &ctx.parse.calls {
            if !NUMERIC_FUNCTIONS.contains(&call.callee.as_str()) {
                continue;
            }
            for arg in &call.string_args {
                // int("3") / float("3.5") are legitimate conversions.
                if matches!(call.callee.as_str(), "int" | "float")
                    && arg.trim().parse::<f64>().is_ok()
                {
                    continue;
                }
                findings.push(StaticFinding {
                    pattern: Pattern::WrongInputType,
                    severity: 6,
                    confidence: 0.8,
                    kind: "string_to_numeric".to_string(),
                    detail: format!(
                        "string '{arg}' passed to numeric function {}()",
                        call.callee
                    ),
                    line: Some(call.line),
                    column: None,
                    subject: Some(call.callee.clone()),
                });
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_python;

    fn run(source: &str) -> Vec<StaticFinding> {
        let parse = parse_python(source).unwrap();
        let ctx = DetectionContext::new(source, &parse);
        WrongInputTypeDetector.detect(&ctx)
    }

    #[test]
    fn string_to_sqrt_flagged() {
        let findings = run("import math\nx = math.sqrt(\"nine\")\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject.as_deref(), Some("sqrt"));
    }

    #[test]
    fn numeric_string_conversion_allowed() {
        let findings = run("x = int(\"42\")\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn non_numeric_string_conversion_flagged() {
        let findings = run("x = int(\"forty-two\")\n");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn numeric_args_fine() {
        let findings = run("import math\nx = math.sqrt(9)\n");
        assert!(findings.is_empty());
    }
}
