//! Missing-corner-case detector — unguarded boundary operations.
//!
//! Conservative by design: only divisions with no visible guard on the
//! denominator and unguarded subscripts on parameters are flagged.

use mirage_core::types::Pattern;

use super::{DetectionContext, StaticDetector, StaticFinding};

pub struct CornerCaseDetector;

/// Lines of surrounding context inspected for a protective check.
const GUARD_WINDOW: u32 = 5;

impl StaticDetector for CornerCaseDetector {
    fn id(&self) -> &'static str {
        "corner-case"
    }

    fn pattern(&self) -> Pattern {
        Pattern::MissingCornerCase
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<StaticFinding> {
        let mut findings = Vec::new();

        for division in &ctx.parse.divisions {
            if division.denominator.is_empty() || is_literal_nonzero(&division.denominator) {
                continue;
            }
            if division_guarded(ctx, division.line, &division.denominator) {
                continue;
            }
            findings.push(StaticFinding {
                pattern: Pattern::MissingCornerCase,
                severity: 5,
                confidence: 0.65,
                kind: "unguarded_division".to_string(),
                detail: format!(
                    "division by '{}' with no zero check",
                    division.denominator
                ),
                line: Some(division.line),
                column: None,
                subject: Some(division.denominator.clone()),
            });
        }

        // Unguarded indexing of function parameters: `items[0]` with no
        // emptiness check anywhere before it.
        let param_names: Vec<&str> = ctx
            .parse
            .functions
            .iter()
            .flat_map(|f| f.params.iter().map(|p| p.name.as_str()))
            .collect();
        for sub in &ctx.parse.subscripts {
            if !param_names.contains(&sub.object.as_str()) {
                continue;
            }
            if subscript_guarded(ctx, sub.line, &sub.object) {
                continue;
            }
            findings.push(StaticFinding {
                pattern: Pattern::MissingCornerCase,
                severity: 4,
                confidence: 0.55,
                kind: "unguarded_indexing".to_string(),
                detail: format!("indexing '{}' with no emptiness check", sub.object),
                line: Some(sub.line),
                column: None,
                subject: Some(sub.object.clone()),
            });
        }

        findings
    }
}

fn is_literal_nonzero(denominator: &str) -> bool {
    denominator
        .parse::<f64>()
        .map(|v| v != 0.0)
        .unwrap_or(false)
}

/// A division is guarded when nearby context checks the denominator or the
/// site sits under error handling.
fn division_guarded(ctx: &DetectionContext, line: u32, denominator: &str) -> bool {
    // Any conditional before the site mentioning the denominator.
    let conditional_guard = ctx
        .parse
        .conditionals
        .iter()
        .any(|c| c.line <= line && c.condition.contains(denominator));
    if conditional_guard {
        return true;
    }

    let window = context_window(ctx, line);
    window.contains("!= 0")
        || window.contains("== 0")
        || window.contains("ZeroDivisionError")
        || window.contains(&format!("if not {denominator}"))
        || window.contains("if len(")
        || (window.contains("try:") && window.contains("except"))
}

fn subscript_guarded(ctx: &DetectionContext, line: u32, object: &str) -> bool {
    let conditional_guard = ctx
        .parse
        .conditionals
        .iter()
        .any(|c| c.line <= line && c.condition.contains(object));
    if conditional_guard {
        return true;
    }
    let window = context_window(ctx, line);
    window.contains(&format!("if {object}"))
        || window.contains(&format!("if not {object}"))
        || window.contains("if len(")
        || window.contains("IndexError")
        || (window.contains("try:") && window.contains("except"))
}

fn context_window(ctx: &DetectionContext, line: u32) -> String {
    let start = line.saturating_sub(GUARD_WINDOW + 1) as usize;
    let end = ((line + GUARD_WINDOW - 1) as usize).min(ctx.lines.len());
    ctx.lines[start.min(ctx.lines.len())..end].join("\n")
}
