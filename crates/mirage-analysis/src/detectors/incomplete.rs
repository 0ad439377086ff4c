//! Incomplete-generation detector — cut-off or placeholder code.

use mirage_core::types::Pattern;
use regex::Regex;
use std::sync::OnceLock;

use crate::parser::types::FunctionBody;

use super::{DetectionContext, StaticDetector, StaticFinding};

pub struct IncompleteDetector;

fn trailing_assignment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\w+\s*=\s*$").expect("static regex"))
}

impl StaticDetector for IncompleteDetector {
    fn id(&self) -> &'static str {
        "incomplete"
    }

    fn pattern(&self) -> Pattern {
        Pattern::IncompleteGeneration
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<StaticFinding> {
        let mut findings = Vec::new();

        // Placeholder function bodies.
        for func in &ctx.parse.functions {
            let (kind, what) = match func.body {
                FunctionBody::PassOnly => ("pass_only", "contains only 'pass'"),
                FunctionBody::EllipsisOnly => ("ellipsis_only", "contains only '...'"),
                FunctionBody::DocstringOnly => {
                    ("docstring_only", "contains only a docstring")
                }
                FunctionBody::Normal => continue,
            };
            findings.push(StaticFinding {
                pattern: Pattern::IncompleteGeneration,
                severity: 7,
                confidence: 0.9,
                kind: kind.to_string(),
                detail: format!("function '{}' {what}", func.name),
                line: Some(func.line),
                column: None,
                subject: Some(func.name.clone()),
            });
        }

        // Trailing assignment tokens with no right-hand side.
        for (i, line) in ctx.lines.iter().enumerate() {
            if trailing_assignment().is_match(line) {
                findings.push(StaticFinding {
                    pattern: Pattern::IncompleteGeneration,
                    severity: 7,
                    confidence: 0.9,
                    kind: "dangling_assignment".to_string(),
                    detail: "assignment with no right-hand side".to_string(),
                    line: Some(i as u32 + 1),
                    column: None,
                    subject: None,
                });
            }
        }

        // TODO/FIXME markers as the sole comment content.
        for comment in &ctx.parse.comments {
            let body = comment.text.trim().trim_end_matches(':').trim();
            if body.eq_ignore_ascii_case("todo") || body.eq_ignore_ascii_case("fixme") {
                findings.push(StaticFinding {
                    pattern: Pattern::IncompleteGeneration,
                    severity: 6,
                    confidence: 0.8,
                    kind: "todo_marker".to_string(),
                    detail: format!("comment is only a placeholder marker ('{body}')"),
                    line: Some(comment.line),
                    column: None,
                    subject: None,
                });
            }
        }

        findings
    }
}
