//! Wrong-return-shape surface — value category of the last reachable return.
//!
//! One signal for the linguistic layer to confirm against the prompt's
//! declared return intent; no finding is emitted here.

use serde::{Deserialize, Serialize};

use crate::parser::types::ValueCategory;

use super::DetectionContext;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnShapeSignal {
    pub category: ValueCategory,
    pub line: u32,
    pub function: Option<String>,
}

/// The last reachable return in the program, when any returns a value.
pub fn signal(ctx: &DetectionContext) -> Option<ReturnShapeSignal> {
    ctx.parse
        .returns
        .iter()
        .filter(|r| r.category != ValueCategory::NoneValue || !r.expr.is_empty())
        .next_back()
        .map(|r| ReturnShapeSignal {
            category: r.category,
            line: r.line,
            function: r.function.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_python;

    #[test]
    fn last_return_wins() {
        let source = "def f(x):\n    if x:\n        return 0\n    return [x]\n";
        let parse = parse_python(source).unwrap();
        let ctx = DetectionContext::new(source, &parse);
        let sig = signal(&ctx).unwrap();
        assert_eq!(sig.category, ValueCategory::Sequence);
        assert_eq!(sig.line, 4);
    }

    #[test]
    fn no_returns_no_signal() {
        let source = "def f(x):\n    print(x)\n";
        let parse = parse_python(source).unwrap();
        let ctx = DetectionContext::new(source, &parse);
        assert!(signal(&ctx).is_none());
    }
}
