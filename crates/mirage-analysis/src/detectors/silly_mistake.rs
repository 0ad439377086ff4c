//! Silly-mistake detector — structurally non-human patterns.
//!
//! Identical if/else branches, `x and x` / `x or x`, and the
//! reversed-discount-operand shape. The last is a known-noisy heuristic;
//! the classifier floors its severity at 4 rather than suppressing it.

use mirage_core::types::Pattern;
use regex::Regex;
use std::sync::OnceLock;

use super::{DetectionContext, StaticDetector, StaticFinding};

pub struct SillyMistakeDetector;

fn reversed_operands() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(discount|rate|percent)\s*-\s*\w+").expect("static regex")
    })
}

impl StaticDetector for SillyMistakeDetector {
    fn id(&self) -> &'static str {
        "silly-mistake"
    }

    fn pattern(&self) -> Pattern {
        Pattern::SillyMistake
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<StaticFinding> {
        let mut findings = Vec::new();

        // Identical if/else branches.
        for cond in &ctx.parse.conditionals {
            let Some(alternative) = &cond.alternative else {
                continue;
            };
            if !cond.consequence.is_empty() && cond.consequence == *alternative {
                findings.push(StaticFinding {
                    pattern: Pattern::SillyMistake,
                    severity: 6,
                    confidence: 0.9,
                    kind: "identical_branches".to_string(),
                    detail: "if and else branches contain identical code".to_string(),
                    line: Some(cond.line),
                    column: None,
                    subject: None,
                });
            }
        }

        // `x and x` / `x or x`.
        for op in &ctx.parse.boolean_ops {
            if !op.left.is_empty() && op.left == op.right {
                findings.push(StaticFinding {
                    pattern: Pattern::SillyMistake,
                    severity: 5,
                    confidence: 0.85,
                    kind: "self_boolean_op".to_string(),
                    detail: format!("'{} {} {}' is redundant", op.left, op.op, op.right),
                    line: Some(op.line),
                    column: None,
                    subject: Some(op.left.clone()),
                });
            }
        }

        // Reversed discount/price operand shape.
        for (i, line) in ctx.lines.iter().enumerate() {
            let code_part = line.split('#').next().unwrap_or("");
            if reversed_operands().is_match(code_part) {
                findings.push(StaticFinding {
                    pattern: Pattern::SillyMistake,
                    severity: 5,
                    confidence: 0.6,
                    kind: "reversed_operands".to_string(),
                    detail: "possible reversed operands in price/discount arithmetic"
                        .to_string(),
                    line: Some(i as u32 + 1),
                    column: None,
                    subject: None,
                });
            }
        }

        findings
    }
}
