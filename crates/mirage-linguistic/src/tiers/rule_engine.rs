//! Tier 1 — regex rule engine.
//!
//! Fast textual scans over prompt and code yielding candidates with
//! per-item rationale. High recall, low precision; every pattern is
//! compiled once so a full scan stays well under the 20 ms budget.

use regex::Regex;
use std::sync::OnceLock;

use crate::keywords::{
    prompt_numbers, prompt_quoted, prompt_sequences, sequence_numbers, ACTION_VERBS, SHAPE_TYPES,
};

use super::{Candidate, Question};

/// A named feature pattern: fires when the regex matches the code and none
/// of the guard words appear in the prompt.
struct FeatureRule {
    feature: &'static str,
    pattern: &'static str,
    guards: &'static [&'static str],
}

const NPC_RULES: &[FeatureRule] = &[
    FeatureRule {
        feature: "debugging output",
        pattern: r"(?m)\bprint\s*\(|\bbreakpoint\s*\(|^\s*import\s+pdb\b",
        guards: &["print", "debug", "output", "display", "show"],
    },
    FeatureRule {
        feature: "logging",
        pattern: r"\blogging\.|\blogger\.|\.debug\(|\.info\(|\.warning\(",
        guards: &["log", "logging"],
    },
    FeatureRule {
        feature: "input validation",
        pattern: r"\bassert\s|\braise\s|if\s+.+\s+is\s+None\b|if\s+not\s+\w+\s*:",
        guards: &["validate", "validation", "check", "error", "invalid", "guard", "handle"],
    },
    FeatureRule {
        feature: "error handling",
        pattern: r"(?m)^\s*try\s*:",
        guards: &["error", "exception", "handle", "try"],
    },
    FeatureRule {
        feature: "authorization checks",
        pattern: r"\badmin\b|\bauth\w*\b|\bpermission\b|\brole\b",
        guards: &["admin", "auth", "permission", "role", "user", "access"],
    },
    FeatureRule {
        feature: "caching",
        pattern: r"\bcache\w*\b|lru_cache|\bmemo\w*\b",
        guards: &["cache", "memo", "optimize", "performance"],
    },
    FeatureRule {
        feature: "sorting",
        pattern: r"\bsorted\s*\(|\.sort\s*\(",
        guards: &["sort", "order", "rank"],
    },
];

fn compiled_npc() -> &'static Vec<(usize, Regex)> {
    static COMPILED: OnceLock<Vec<(usize, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        NPC_RULES
            .iter()
            .enumerate()
            .map(|(i, rule)| (i, Regex::new(rule.pattern).expect("static rule pattern")))
            .collect()
    })
}

/// Algorithm markers: a prompt keyword and the code shapes that would
/// plausibly implement it.
const ALGORITHM_MARKERS: &[(&str, &[&str])] = &[
    ("average", &["/", "mean("]),
    ("sort", &["sorted(", ".sort("]),
    ("filter", &["if ", "filter("]),
    ("search", &["in ", "index(", "find("]),
    ("count", &["count(", "len(", "+= 1"]),
    ("reverse", &["reversed(", "[::-1]", ".reverse("]),
    ("duplicate", &["set(", "fromkeys", "in "]),
];

pub struct RuleEngine;

impl RuleEngine {
    /// Scan one question. Prompt and code arrive as written; all matching
    /// is case-insensitive on lowered copies.
    pub fn scan(question: Question, prompt: &str, code: &str) -> Vec<Candidate> {
        let prompt_lower = prompt.to_lowercase();
        let code_lower = code.to_lowercase();
        match question {
            Question::Npc => Self::scan_npc(&prompt_lower, code),
            Question::PromptBias => Self::scan_prompt_bias(prompt, code),
            Question::MissingFeature => Self::scan_missing(&prompt_lower, &code_lower),
            Question::Misinterpretation => Self::scan_misinterpretation(&prompt_lower, &code_lower),
        }
    }

    fn scan_npc(prompt_lower: &str, code: &str) -> Vec<Candidate> {
        let mut out = Vec::new();
        for (idx, regex) in compiled_npc() {
            let rule = &NPC_RULES[*idx];
            if !regex.is_match(code) {
                continue;
            }
            if rule.guards.iter().any(|g| prompt_lower.contains(g)) {
                continue;
            }
            out.push(Candidate {
                kind: "unrequested_feature",
                value: rule.feature.to_string(),
                message: format!("{} present but not requested", rule.feature),
                confidence: 0.8,
                severity: Question::Npc.base_severity(),
            });
        }
        out
    }

    fn scan_prompt_bias(prompt: &str, code: &str) -> Vec<Candidate> {
        let mut out = Vec::new();
        // Ignore comments when looking for echoes.
        let code_clean: String = code
            .lines()
            .map(|l| l.split('#').next().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n");

        for number in prompt_numbers(prompt) {
            if code_clean.contains(&number) {
                out.push(Candidate {
                    kind: "hardcoded_number",
                    value: number.clone(),
                    message: format!("number {number} from the prompt appears in the code"),
                    confidence: 0.75,
                    severity: Question::PromptBias.base_severity(),
                });
            }
        }

        for quoted in prompt_quoted(prompt) {
            if code_clean.contains(&quoted) {
                out.push(Candidate {
                    kind: "hardcoded_string",
                    value: quoted.clone(),
                    message: format!("example string \"{quoted}\" from the prompt appears in the code"),
                    confidence: 0.8,
                    severity: Question::PromptBias.base_severity(),
                });
            }
        }

        for sequence in prompt_sequences(prompt) {
            let wanted = sequence_numbers(&sequence);
            if wanted.is_empty() {
                continue;
            }
            // Order-insensitive: [3,1,2] in the prompt matches [1, 2, 3].
            for code_seq in find_sequences(&code_clean) {
                if sequence_numbers(&code_seq) == wanted {
                    out.push(Candidate {
                        kind: "hardcoded_sequence",
                        value: code_seq.clone(),
                        message: format!(
                            "sequence {code_seq} echoes the prompt example {sequence}"
                        ),
                        confidence: 0.85,
                        severity: Question::PromptBias.base_severity(),
                    });
                }
            }
        }

        out
    }

    fn scan_missing(prompt_lower: &str, code_lower: &str) -> Vec<Candidate> {
        let mut out = Vec::new();

        for verb in ACTION_VERBS {
            let word = format!(" {verb}");
            let requested = prompt_lower.starts_with(verb)
                || prompt_lower.contains(&word)
                || prompt_lower.contains(&format!("{verb} "));
            if requested && !code_lower.contains(verb) {
                out.push(Candidate {
                    kind: "missing_action",
                    value: verb.to_string(),
                    message: format!("'{verb}' requested but absent from the code"),
                    confidence: 0.6,
                    severity: Question::MissingFeature.base_severity(),
                });
            }
        }

        for shape in SHAPE_TYPES {
            if prompt_lower.contains(shape) && !code_lower.contains(shape) {
                out.push(Candidate {
                    kind: "missing_type",
                    value: shape.to_string(),
                    message: format!("'{shape}' mentioned in the prompt but not used"),
                    confidence: 0.5,
                    severity: Question::MissingFeature.base_severity(),
                });
            }
        }

        out
    }

    fn scan_misinterpretation(prompt_lower: &str, code_lower: &str) -> Vec<Candidate> {
        let mut out = Vec::new();

        let asks_return = prompt_lower.contains("return") || prompt_lower.contains("output");
        if asks_return && code_lower.contains("print(") && !code_lower.contains("return") {
            out.push(Candidate {
                kind: "print_vs_return",
                value: "print".to_string(),
                message: "prompt asks for a returned value but the code only prints".to_string(),
                confidence: 0.7,
                severity: Question::Misinterpretation.base_severity(),
            });
        }

        let asks_selection = ["filter", "remove", "exclude"]
            .iter()
            .any(|k| prompt_lower.contains(k));
        if asks_selection && !code_lower.contains("if ") && !code_lower.contains("filter(") {
            out.push(Candidate {
                kind: "no_selection",
                value: "conditional selection".to_string(),
                message: "filtering requested but no conditional selection is present"
                    .to_string(),
                confidence: 0.65,
                severity: Question::Misinterpretation.base_severity(),
            });
        }

        for (keyword, markers) in ALGORITHM_MARKERS {
            if !prompt_lower.contains(keyword) {
                continue;
            }
            if markers.iter().any(|m| code_lower.contains(m)) {
                continue;
            }
            let message = if *keyword == "average" && code_lower.contains("sum(") {
                "returns sum instead of average".to_string()
            } else {
                format!("'{keyword}' requested but no matching implementation shape found")
            };
            out.push(Candidate {
                kind: "wrong_algorithm",
                value: keyword.to_string(),
                message,
                confidence: 0.6,
                severity: Question::Misinterpretation.base_severity(),
            });
        }

        out
    }
}

/// All bracketed sequence texts in the code.
fn find_sequences(code: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\[[^\[\]]*\]").expect("static regex"));
    re.find_iter(code).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npc_flags_unrequested_print() {
        let candidates = RuleEngine::scan(
            Question::Npc,
            "add two numbers",
            "def add(a, b):\n    print(a)\n    return a + b\n",
        );
        assert!(candidates.iter().any(|c| c.value == "debugging output"));
    }

    #[test]
    fn npc_respects_prompt_guard() {
        let candidates = RuleEngine::scan(
            Question::Npc,
            "print the sum of two numbers",
            "def add(a, b):\n    print(a + b)\n",
        );
        assert!(!candidates.iter().any(|c| c.value == "debugging output"));
    }

    #[test]
    fn bias_catches_order_insensitive_sequence_echo() {
        let candidates = RuleEngine::scan(
            Question::PromptBias,
            "sort the list, e.g., [3,1,2]",
            "def sort(x):\n    return [1, 2, 3]\n",
        );
        assert!(candidates.iter().any(|c| c.kind == "hardcoded_sequence"));
        assert!(candidates.iter().any(|c| c.value.contains("[1, 2, 3]")));
    }

    #[test]
    fn bias_quiet_without_examples() {
        let candidates = RuleEngine::scan(
            Question::PromptBias,
            "divide a by b",
            "def divide(a, b):\n    return a / b\n",
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn missing_action_detected() {
        let candidates = RuleEngine::scan(
            Question::MissingFeature,
            "validate the email and sort the results",
            "def handle(email):\n    return email\n",
        );
        assert!(candidates.iter().any(|c| c.value == "validate"));
        assert!(candidates.iter().any(|c| c.value == "sort"));
    }

    #[test]
    fn misinterpretation_sum_for_average() {
        let candidates = RuleEngine::scan(
            Question::Misinterpretation,
            "return the average of a list of numbers",
            "def avg(nums):\n    return sum(nums)\n",
        );
        assert!(candidates
            .iter()
            .any(|c| c.message == "returns sum instead of average"));
    }

    #[test]
    fn clean_add_is_quiet_everywhere() {
        let prompt = "add two numbers";
        let code = "def add(a, b):\n    return a + b\n";
        for question in [
            Question::Npc,
            Question::PromptBias,
            Question::MissingFeature,
            Question::Misinterpretation,
        ] {
            let candidates = RuleEngine::scan(question, prompt, code);
            assert!(
                candidates.is_empty(),
                "{:?} produced {candidates:?}",
                question
            );
        }
    }
}
