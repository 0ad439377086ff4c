//! Tier 2 — structural verification of Tier-1 candidates.
//!
//! Works over the parse produced by the static layer; nothing re-parses.
//! A candidate the AST can refute is discarded (a `print` matched inside a
//! comment, a literal outside any decision position, a literal confined to
//! the `if __name__ == "__main__"` block). Candidates the AST cannot check
//! pass through unchanged — refutation only, no voting.

use mirage_analysis::analyzer::StaticReport;
use mirage_analysis::detectors::prompt_bias::LiteralKind;
use mirage_analysis::parser::types::{LiteralContext, ValueCategory};

use crate::keywords::sequence_numbers;

use super::{Candidate, Question};

pub struct AstVerifier;

impl AstVerifier {
    pub fn verify(
        question: Question,
        prompt: &str,
        report: &StaticReport,
        tier1: &[Candidate],
    ) -> Vec<Candidate> {
        match question {
            Question::Npc => Self::verify_npc(report, tier1),
            Question::PromptBias => Self::verify_prompt_bias(report, tier1),
            Question::MissingFeature => Self::verify_missing(report, tier1),
            Question::Misinterpretation => Self::verify_misinterpretation(prompt, report, tier1),
        }
    }

    fn verify_npc(report: &StaticReport, tier1: &[Candidate]) -> Vec<Candidate> {
        let parse = &report.parse;
        let has_call = |names: &[&str]| {
            parse.calls.iter().any(|c| {
                names.contains(&c.callee.as_str())
                    || c.receiver
                        .as_deref()
                        .map(|r| names.iter().any(|n| r.contains(n)))
                        .unwrap_or(false)
            })
        };

        tier1
            .iter()
            .filter(|candidate| match candidate.value.as_str() {
                "debugging output" => {
                    has_call(&["print", "breakpoint"])
                        || parse.imports.iter().any(|i| i.module.contains("pdb"))
                }
                "logging" => {
                    has_call(&["debug", "info", "warning", "error", "log"])
                        || parse.imports.iter().any(|i| i.module.starts_with("logging"))
                }
                "sorting" => has_call(&["sorted", "sort"]),
                "caching" => {
                    parse.functions.iter().any(|f| {
                        f.decorators
                            .iter()
                            .any(|d| d.contains("cache") || d.contains("memo"))
                    }) || has_call(&["cache"])
                }
                "error handling" => parse.try_count > 0,
                "authorization checks" => parse.conditionals.iter().any(|c| {
                    ["admin", "auth", "permission", "role"]
                        .iter()
                        .any(|k| c.condition.to_lowercase().contains(k))
                }),
                // `raise`/`assert` forms are not individually extracted;
                // refutation is not possible, pass through.
                _ => true,
            })
            .map(|c| confirmed(c))
            .collect()
    }

    fn verify_prompt_bias(report: &StaticReport, tier1: &[Candidate]) -> Vec<Candidate> {
        let mut out = Vec::new();
        for candidate in tier1 {
            let confirmed_at = report.literal_candidates.iter().find(|lit| {
                let value_matches = match (candidate.kind, lit.kind) {
                    ("hardcoded_number", LiteralKind::Number) => lit.value == candidate.value,
                    ("hardcoded_string", LiteralKind::String) => lit.value == candidate.value,
                    ("hardcoded_sequence", LiteralKind::Sequence) => {
                        sequence_numbers(&lit.value) == sequence_numbers(&candidate.value)
                    }
                    _ => false,
                };
                value_matches
                    && !lit.in_main_block
                    && matches!(
                        lit.context,
                        LiteralContext::Return
                            | LiteralContext::Comparison
                            | LiteralContext::Assignment
                    )
            });
            if let Some(lit) = confirmed_at {
                let mut kept = confirmed(candidate);
                kept.message = format!("{} (line {})", candidate.message, lit.line);
                out.push(kept);
            }
        }
        out
    }

    fn verify_missing(report: &StaticReport, tier1: &[Candidate]) -> Vec<Candidate> {
        let parse = &report.parse;
        let sequence_params = ["nums", "numbers", "items", "values", "data", "lst", "arr", "xs"];

        tier1
            .iter()
            .filter(|candidate| match candidate.kind {
                "missing_action" => {
                    let verb = candidate.value.as_str();
                    let implemented = parse.functions.iter().any(|f| f.name.contains(verb))
                        || parse.calls.iter().any(|c| c.callee.contains(verb))
                        || parse.defined_names.iter().any(|n| n.contains(verb));
                    !implemented
                }
                "missing_type" => match candidate.value.as_str() {
                    "list" | "array" | "tuple" => {
                        let satisfied = !parse.sequence_literals.is_empty()
                            || !parse.subscripts.is_empty()
                            || report
                                .return_shape
                                .as_ref()
                                .map(|s| s.category == ValueCategory::Sequence)
                                .unwrap_or(false)
                            || parse.functions.iter().any(|f| {
                                f.params
                                    .iter()
                                    .any(|p| sequence_params.contains(&p.name.as_str()))
                            });
                        !satisfied
                    }
                    "dict" | "dictionary" => {
                        let satisfied = !parse.dict_vars.is_empty()
                            || report
                                .return_shape
                                .as_ref()
                                .map(|s| s.category == ValueCategory::Mapping)
                                .unwrap_or(false);
                        !satisfied
                    }
                    "string" => parse.string_literals.is_empty(),
                    _ => true,
                },
                _ => true,
            })
            .map(|c| {
                let mut kept = confirmed(c);
                kept.confidence = 0.85;
                kept
            })
            .collect()
    }

    fn verify_misinterpretation(
        prompt: &str,
        report: &StaticReport,
        tier1: &[Candidate],
    ) -> Vec<Candidate> {
        let parse = &report.parse;
        let mut out: Vec<Candidate> = tier1
            .iter()
            .filter(|candidate| match candidate.kind {
                "print_vs_return" => {
                    let prints = parse.calls.iter().any(|c| c.callee == "print");
                    let has_value_return = parse.returns.iter().any(|r| !r.expr.is_empty());
                    prints && !has_value_return
                }
                "no_selection" => parse.conditionals.is_empty(),
                "wrong_algorithm" if candidate.value == "average" => parse.divisions.is_empty(),
                _ => true,
            })
            .map(|c| confirmed(c))
            .collect();

        // Tier-2-only evidence: the declared return intent against the
        // value category of the last reachable return. Only the direct
        // phrase counts — "the average of a list" does not request a list.
        let expects_sequence = sequence_return_phrase().is_match(&prompt.to_lowercase());
        if expects_sequence {
            if let Some(shape) = &report.return_shape {
                if shape.category == ValueCategory::Scalar {
                    out.push(Candidate {
                        kind: "return_shape_mismatch",
                        value: "scalar".to_string(),
                        message: format!(
                            "a sequence was requested but line {} returns a scalar",
                            shape.line
                        ),
                        confidence: 0.9,
                        severity: Question::Misinterpretation.base_severity(),
                    });
                }
            }
        }

        out
    }
}

fn sequence_return_phrase() -> &'static regex::Regex {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"return(?:s|ing)?\s+(?:a\s+|the\s+)?(?:list|array|sequence)\b")
            .expect("static regex")
    })
}

fn confirmed(candidate: &Candidate) -> Candidate {
    let mut kept = candidate.clone();
    kept.confidence = kept.confidence.max(0.9);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiers::rule_engine::RuleEngine;
    use mirage_analysis::analyzer::StaticAnalyzer;

    fn pipeline(question: Question, prompt: &str, code: &str) -> (Vec<Candidate>, Vec<Candidate>) {
        let report = StaticAnalyzer::analyze(code).unwrap();
        let tier1 = RuleEngine::scan(question, prompt, code);
        let tier2 = AstVerifier::verify(question, prompt, &report, &tier1);
        (tier1, tier2)
    }

    #[test]
    fn print_in_comment_is_discarded() {
        let (tier1, tier2) = pipeline(
            Question::Npc,
            "add two numbers",
            "def add(a, b):\n    # print(a) was here\n    return a + b\n",
        );
        assert!(tier1.iter().any(|c| c.value == "debugging output"));
        assert!(!tier2.iter().any(|c| c.value == "debugging output"));
    }

    #[test]
    fn real_print_survives() {
        let (_, tier2) = pipeline(
            Question::Npc,
            "add two numbers",
            "def add(a, b):\n    print(a)\n    return a + b\n",
        );
        assert!(tier2.iter().any(|c| c.value == "debugging output"));
    }

    #[test]
    fn main_block_literal_is_discarded() {
        let (tier1, tier2) = pipeline(
            Question::PromptBias,
            "multiply by 7",
            "def times(n):\n    return n * k\n\nif __name__ == \"__main__\":\n    print(times(7))\n",
        );
        assert!(tier1.iter().any(|c| c.value == "7"));
        assert!(tier2.is_empty());
    }

    #[test]
    fn return_position_sequence_survives() {
        let (_, tier2) = pipeline(
            Question::PromptBias,
            "sort the list, e.g., [3,1,2]",
            "def sort(x):\n    return [1, 2, 3]\n",
        );
        assert!(tier2.iter().any(|c| c.kind == "hardcoded_sequence"));
    }

    #[test]
    fn missing_action_confirmed_only_when_unimplemented() {
        let (tier1, tier2) = pipeline(
            Question::MissingFeature,
            "sort and filter the records",
            "def sort_records(records):\n    return sorted(records)\n",
        );
        // "sort" is implemented so tier 1 never proposes it; "filter" has
        // no counterpart and survives verification.
        assert!(!tier1.iter().any(|c| c.value == "sort"));
        assert!(tier2.iter().any(|c| c.value == "filter"));
    }

    #[test]
    fn sum_for_average_confirmed() {
        let (_, tier2) = pipeline(
            Question::Misinterpretation,
            "return the average of a list of numbers",
            "def avg(nums):\n    return sum(nums)\n",
        );
        assert!(tier2
            .iter()
            .any(|c| c.message == "returns sum instead of average"));
    }

    #[test]
    fn average_with_division_refuted() {
        let (_, tier2) = pipeline(
            Question::Misinterpretation,
            "return the average of a list of numbers",
            "def avg(nums):\n    return sum(nums) / len(nums)\n",
        );
        assert!(!tier2.iter().any(|c| c.kind == "wrong_algorithm"));
    }
}
