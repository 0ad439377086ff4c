//! Syntax detector — reports the first parser error.

use mirage_core::types::Pattern;

use super::{DetectionContext, StaticDetector, StaticFinding};

pub struct SyntaxDetector;

impl StaticDetector for SyntaxDetector {
    fn id(&self) -> &'static str {
        "syntax"
    }

    fn pattern(&self) -> Pattern {
        Pattern::SyntaxError
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<StaticFinding> {
        let Some(error) = &ctx.parse.error else {
            return Vec::new();
        };
        vec![StaticFinding {
            pattern: Pattern::SyntaxError,
            severity: 9,
            confidence: 1.0,
            kind: "parse_error".to_string(),
            detail: error.message.clone(),
            line: Some(error.line),
            column: Some(error.column),
            subject: None,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_python;

    #[test]
    fn missing_colon_flagged_at_line_one() {
        let parse = parse_python("def add(a,b)\n    return a+b").unwrap();
        let ctx = DetectionContext::new("def add(a,b)\n    return a+b", &parse);
        let findings = SyntaxDetector.detect(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, Some(1));
        assert!(findings[0].severity >= 8);
    }

    #[test]
    fn clean_code_yields_nothing() {
        let parse = parse_python("def add(a, b):\n    return a + b").unwrap();
        let ctx = DetectionContext::new("def add(a, b):\n    return a + b", &parse);
        assert!(SyntaxDetector.detect(&ctx).is_empty());
    }
}
