//! Prompt-bias static surface — candidate literal collection.
//!
//! Final judgment is delegated to the linguistic layer; this surface only
//! gathers the literals that could have been echoed from prompt examples,
//! with enough position information for the AST verifier to filter them.

use serde::{Deserialize, Serialize};

use crate::parser::types::{LiteralContext, LiteralInfo};

use super::DetectionContext;

/// One literal that may be an echo of a prompt example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralCandidate {
    pub value: String,
    pub line: u32,
    pub context: LiteralContext,
    pub in_main_block: bool,
    pub kind: LiteralKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    String,
    Number,
    Sequence,
}

/// Collect all candidate literals from the parse.
pub fn collect_candidates(ctx: &DetectionContext) -> Vec<LiteralCandidate> {
    let mut out = Vec::new();
    let push = |out: &mut Vec<LiteralCandidate>, lit: &LiteralInfo, kind: LiteralKind| {
        out.push(LiteralCandidate {
            value: lit.value.clone(),
            line: lit.line,
            context: lit.context,
            in_main_block: lit.in_main_block,
            kind,
        });
    };

    for lit in &ctx.parse.string_literals {
        if lit.value.len() >= 2 {
            push(&mut out, lit, LiteralKind::String);
        }
    }
    for lit in &ctx.parse.numeric_literals {
        // 0/1/2 are structural, not example echoes.
        let trivial = matches!(lit.value.as_str(), "0" | "1" | "2");
        if !trivial {
            push(&mut out, lit, LiteralKind::Number);
        }
    }
    for lit in &ctx.parse.sequence_literals {
        push(&mut out, lit, LiteralKind::Sequence);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_python;

    #[test]
    fn collects_decision_position_literals() {
        let source = "def sort(x):\n    return [1, 2, 3]\n";
        let parse = parse_python(source).unwrap();
        let ctx = DetectionContext::new(source, &parse);
        let candidates = collect_candidates(&ctx);
        assert!(candidates
            .iter()
            .any(|c| c.kind == LiteralKind::Sequence && c.value == "[1, 2, 3]"));
        assert!(candidates
            .iter()
            .all(|c| c.context == LiteralContext::Return));
    }

    #[test]
    fn trivial_numbers_skipped() {
        let source = "x = 1\ny = 42\n";
        let parse = parse_python(source).unwrap();
        let ctx = DetectionContext::new(source, &parse);
        let candidates = collect_candidates(&ctx);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value, "42");
    }
}
