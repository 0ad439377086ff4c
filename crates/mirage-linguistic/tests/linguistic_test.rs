//! Linguistic layer integration — the full cascade in fallback mode
//! (no providers configured), which is the deterministic path.

use mirage_analysis::analyzer::StaticAnalyzer;
use mirage_core::config::ProvidersConfig;
use mirage_core::types::VerdictAuthority;
use mirage_linguistic::{LinguisticAnalyzer, LinguisticInput, LlmReasoner};

async fn analyze(prompt: &str, code: &str) -> mirage_core::types::LinguisticReport {
    let report = StaticAnalyzer::analyze(code).unwrap();
    let analyzer =
        LinguisticAnalyzer::new(LlmReasoner::from_config(&ProvidersConfig::default(), 30));
    let input = LinguisticInput {
        prompt,
        code,
        report: &report,
    };
    analyzer.analyze(&input).await
}

// ---- example echoes in decision positions ----

#[tokio::test]
async fn example_sequence_echo_is_prompt_bias() {
    let report = analyze(
        "sort the list, e.g., [3,1,2]",
        "def sort(x):\n    return [1,2,3]",
    )
    .await;

    assert!(report.prompt_bias.found);
    assert!(report.prompt_bias.severity >= 5 && report.prompt_bias.severity <= 7);
    assert!(
        report
            .prompt_bias
            .items
            .iter()
            .any(|i| i.contains("[1,2,3]") || i.contains("1, 2, 3") || i.contains('3')),
        "items: {:?}",
        report.prompt_bias.items
    );
    assert!(report.intent_match_score < 0.5);
    assert_eq!(report.prompt_bias.verdict_by, VerdictAuthority::Fallback);
    // Evidence from both tiers travels with the verdict.
    assert!(!report.prompt_bias.evidence.tier1.is_empty());
    assert!(!report.prompt_bias.evidence.tier2.is_empty());
}

// ---- wrong algorithm ----

#[tokio::test]
async fn sum_instead_of_average_is_misinterpretation() {
    let report = analyze(
        "return the average of a list of numbers",
        "def avg(nums):\n    return sum(nums)",
    )
    .await;

    assert!(report.misinterpretation.found);
    assert!(report.misinterpretation.severity >= 6 && report.misinterpretation.severity <= 9);
    assert!(report
        .misinterpretation
        .summary
        .contains("returns sum instead of average"));
}

// ---- clean code stays clean ----

#[tokio::test]
async fn clean_code_all_quiet() {
    let report = analyze("add two numbers", "def add(a,b):\n    return a+b").await;
    assert!(!report.npc.found);
    assert!(!report.prompt_bias.found);
    assert!(!report.missing_feature.found);
    assert!(!report.misinterpretation.found);
    assert!(report.intent_match_score > 0.0, "'add' is shared vocabulary");
}

// ---- entry-point literals are exempt ----

#[tokio::test]
async fn main_block_only_literal_is_not_bias() {
    let report = analyze(
        "scale values by 9",
        "def scale(values, factor):\n    return [v * factor for v in values]\n\nif __name__ == \"__main__\":\n    print(scale([1], 9))",
    )
    .await;
    assert!(!report.prompt_bias.found, "items: {:?}", report.prompt_bias.items);
}

// ---- The same literal in a decision position is flagged ----

#[tokio::test]
async fn decision_position_literal_is_bias() {
    let report = analyze(
        "scale values by 9",
        "def scale(values):\n    return [v * 9 for v in values]",
    )
    .await;
    assert!(report.prompt_bias.found);
}

// ---- NPC end to end ----

#[tokio::test]
async fn unrequested_error_handling_is_npc() {
    let report = analyze(
        "add two numbers",
        "def add(a, b):\n    try:\n        return a + b\n    except TypeError:\n        return None",
    )
    .await;
    assert!(report.npc.found);
    assert!(report
        .npc
        .items
        .iter()
        .any(|i| i.contains("error handling")));
}

// ---- the intent-match score is exact at the degenerate points ----

mod score_properties {
    use mirage_linguistic::similarity::cosine_tfidf;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn identical_streams_score_one(tokens in proptest::collection::vec("[a-z]{2,8}", 1..20)) {
            let score = cosine_tfidf(&tokens, &tokens);
            prop_assert!((score - 1.0).abs() < 1e-4, "got {}", score);
        }

        #[test]
        fn disjoint_vocabularies_score_zero(n in 1usize..20, m in 1usize..20) {
            let a: Vec<String> = (0..n).map(|i| format!("left{i}")).collect();
            let b: Vec<String> = (0..m).map(|i| format!("right{i}")).collect();
            prop_assert_eq!(cosine_tfidf(&a, &b), 0.0);
        }
    }
}

#[tokio::test]
async fn requested_error_handling_is_not_npc() {
    let report = analyze(
        "add two numbers and handle type errors",
        "def add(a, b):\n    try:\n        return a + b\n    except TypeError:\n        return None",
    )
    .await;
    assert!(!report.npc.items.iter().any(|i| i.contains("error handling")));
}
