//! Wrong-attribute detector — attribute access on inferred dictionaries.
//!
//! Intra-file inference: a variable assigned a dictionary literal (or a
//! `dict(...)` call) is a keyed mapping; `var.key` on it should have been
//! `var["key"]`. Legitimate dict methods are exempt.

use mirage_core::types::Pattern;

use super::{DetectionContext, StaticDetector, StaticFinding};

/// Methods that genuinely exist on dict objects.
const DICT_METHODS: &[&str] = &[
    "get", "keys", "values", "items", "pop", "popitem", "update", "setdefault", "clear", "copy",
    "fromkeys",
];

pub struct WrongAttributeDetector;

impl StaticDetector for WrongAttributeDetector {
    fn id(&self) -> &'static str {
        "wrong-attribute"
    }

    fn pattern(&self) -> Pattern {
        Pattern::WrongAttribute
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<StaticFinding> {
        let parse = ctx.parse;
        let mut findings = Vec::new();

        for access in &parse.attribute_accesses {
            if !parse.dict_vars.contains(&access.object) {
                continue;
            }
            if DICT_METHODS.contains(&access.attribute.as_str()) {
                continue;
            }
            findings.push(StaticFinding {
                pattern: Pattern::WrongAttribute,
                severity: 7,
                confidence: 0.75,
                kind: "dict_attribute".to_string(),
                detail: format!(
                    "'{}' is a dictionary; '{}.{}' should be '{}[\"{}\"]'",
                    access.object, access.object, access.attribute, access.object,
                    access.attribute
                ),
                line: Some(access.line),
                column: None,
                subject: Some(format!("{}.{}", access.object, access.attribute)),
            });
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
        WrongAttributeDetector.detect(&ctx)
    }

    #[test]
    fn attribute_on_dict_literal_flagged() {
        let findings = run("item = {\"cost\": 3}\ntotal = item.cost\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject.as_deref(), Some("item.cost"));
        assert_eq!(findings[0].line, Some(2));
    }

    #[test]
    fn dict_methods_exempt() {
        let findings = run("item = {\"cost\": 3}\ntotal = item.get(\"cost\")\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn non_dict_receivers_ignored() {
        let findings = run("import math\nx = math.pi\n");
        assert!(findings.is_empty());
    }
}
