//! Keyword and token extraction shared by the linguistic detectors.

use mirage_analysis::parser::ParseResult;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Common English stop words filtered from prompt tokens.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "should", "could", "may", "might", "must", "can", "this", "that",
    "it", "its",
];

/// Programming action verbs a prompt may request.
pub const ACTION_VERBS: &[&str] = &[
    "create", "write", "implement", "calculate", "compute", "return", "get", "fetch", "retrieve",
    "find", "search", "check", "validate", "sort", "filter", "parse", "process", "handle",
    "convert", "format", "add", "remove", "delete", "update", "merge", "count", "reverse",
];

/// Container/shape types a prompt may require. Numeric kinds are omitted:
/// arithmetic code satisfies them without naming them.
pub const SHAPE_TYPES: &[&str] = &["list", "dict", "dictionary", "tuple", "array", "string"];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+").expect("static regex"))
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+(?:\.\d+)?\b").expect("static regex"))
}

fn quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"["']([^"']{2,})["']"#).expect("static regex"))
}

fn bracket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\[\]]*\]").expect("static regex"))
}

fn stop_words() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Lowercased prose tokens with stop words and one-character noise removed.
pub fn tokenize_prose(text: &str) -> Vec<String> {
    word_re()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.len() >= 2 && !stop_words().contains(w.as_str()))
        .collect()
}

/// Split an identifier on underscores and camelCase humps. A bare
/// one-character name (a loop variable, a terse parameter) is kept as is;
/// one-character fragments of longer names are acronym noise and dropped.
pub fn split_identifier(identifier: &str) -> Vec<String> {
    if identifier.chars().count() == 1 {
        return vec![identifier.to_lowercase()];
    }
    let mut parts = Vec::new();
    for chunk in identifier.split('_') {
        if chunk.is_empty() {
            continue;
        }
        let mut current = String::new();
        for c in chunk.chars() {
            if c.is_uppercase() && !current.is_empty() {
                parts.push(current.to_lowercase());
                current = String::new();
            }
            current.push(c);
        }
        if !current.is_empty() {
            parts.push(current.to_lowercase());
        }
    }
    parts.retain(|p| p.len() >= 2);
    parts
}

/// The identifier token stream of a program: function names, parameters,
/// bindings, call targets, and attribute names, split into words.
pub fn code_identifier_tokens(parse: &ParseResult) -> Vec<String> {
    let mut tokens = Vec::new();
    for func in &parse.functions {
        tokens.extend(split_identifier(&func.name));
        for param in &func.params {
            tokens.extend(split_identifier(&param.name));
        }
    }
    for name in &parse.defined_names {
        tokens.extend(split_identifier(name));
    }
    for call in &parse.calls {
        tokens.extend(split_identifier(&call.callee));
    }
    for access in &parse.attribute_accesses {
        tokens.extend(split_identifier(&access.attribute));
    }
    tokens
}

/// Numeric example values quoted in the prompt. 0/1/2 are structural.
pub fn prompt_numbers(prompt: &str) -> Vec<String> {
    number_re()
        .find_iter(prompt)
        .map(|m| m.as_str().to_string())
        .filter(|n| !matches!(n.as_str(), "0" | "1" | "2"))
        .collect()
}

/// Quoted example strings in the prompt.
pub fn prompt_quoted(prompt: &str) -> Vec<String> {
    quoted_re()
        .captures_iter(prompt)
        .map(|c| c[1].to_string())
        .collect()
}

/// Bracketed sequence examples in the prompt, as written.
pub fn prompt_sequences(prompt: &str) -> Vec<String> {
    bracket_re()
        .find_iter(prompt)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The multiset of numbers inside a sequence literal, order-insensitive.
pub fn sequence_numbers(text: &str) -> Vec<String> {
    let mut numbers: Vec<String> = number_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    numbers.sort();
    numbers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prose_tokens_drop_stop_words() {
        let tokens = tokenize_prose("sort the list, e.g., [3,1,2]");
        assert!(tokens.contains(&"sort".to_string()));
        assert!(tokens.contains(&"list".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
    }

    #[test]
    fn identifiers_split_both_ways() {
        assert_eq!(split_identifier("calc_total"), vec!["calc", "total"]);
        assert_eq!(split_identifier("calcTotal"), vec!["calc", "total"]);
        // Acronym runs collapse to their trailing word.
        assert_eq!(split_identifier("HTTPServer"), vec!["server"]);
        // Bare one-character names survive.
        assert_eq!(split_identifier("x"), vec!["x"]);
    }

    #[test]
    fn prompt_numbers_skip_structural() {
        assert_eq!(prompt_numbers("sort [3,1,2] and take 0 or 42"), vec!["3", "42"]);
    }

    #[test]
    fn sequences_compare_order_insensitively() {
        assert_eq!(sequence_numbers("[3,1,2]"), sequence_numbers("[1, 2, 3]"));
        assert_ne!(sequence_numbers("[3,1]"), sequence_numbers("[1, 2, 3]"));
    }
}
