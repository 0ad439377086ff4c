//! Hallucination detector — reads of names that resolve to nothing.
//!
//! A name read in expression context must be a language builtin, a binding
//! defined anywhere in the file, or an import. Anything else was likely
//! invented by the generator.

use mirage_core::types::Pattern;
use rustc_hash::FxHashSet;

use super::builtins::whitelist;
use super::{DetectionContext, StaticDetector, StaticFinding};

pub struct HallucinationDetector;

impl StaticDetector for HallucinationDetector {
    fn id(&self) -> &'static str {
        "hallucination"
    }

    fn pattern(&self) -> Pattern {
        Pattern::HallucinatedObject
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<StaticFinding> {
        let parse = ctx.parse;
        let mut findings = Vec::new();
        let mut reported: FxHashSet<&str> = FxHashSet::default();

        for read in &parse.name_reads {
            let name = read.name.as_str();
            if reported.contains(name)
                || whitelist().contains(name)
                || parse.defined_names.contains(name)
            {
                continue;
            }
            reported.insert(name);

            let looks_like_type = name
                .chars()
                .next()
                .map(|c| c.is_ascii_uppercase())
                .unwrap_or(false);
            findings.push(StaticFinding {
                pattern: Pattern::HallucinatedObject,
                severity: 8,
                confidence: 0.85,
                kind: if looks_like_type { "class" } else { "name" }.to_string(),
                detail: format!("'{name}' is not a builtin, a local binding, or an import"),
                line: Some(read.line),
                column: Some(read.column),
                subject: Some(name.to_string()),
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
        HallucinationDetector.detect(&ctx)
    }

    #[test]
    fn unresolved_receiver_flagged() {
        let findings = run("def f(n):\n    return calc.factorial(n)\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject.as_deref(), Some("calc"));
        assert!(findings[0].severity >= 7);
    }

    #[test]
    fn builtins_never_flagged() {
        let findings = run("def f(xs):\n    return len(sorted(xs))\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn imports_resolve() {
        let findings = run("import math\n\ndef f(n):\n    return math.sqrt(n)\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn local_bindings_resolve() {
        let findings = run("acc = 0\nfor v in [1, 2]:\n    acc = acc + v\nprint(acc)\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn each_name_reported_once() {
        let findings = run("print(ghost)\nprint(ghost)\n");
        assert_eq!(findings.len(), 1);
    }
}
