//! Two-phase analysis orchestration.

use std::time::Instant;

use mirage_analysis::analyzer::{StaticAnalyzer, StaticReport};
use mirage_core::errors::StorageError;
use mirage_core::types::{
    AnalysisRecord, DynamicReport, LinguisticExtras, LinguisticReport, StageLog,
};
use mirage_analysis::taxonomy::{classifier, explainer};
use mirage_linguistic::LinguisticInput;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Language tag of the target source under study.
const TARGET_LANGUAGE: &str = "python";

/// Phase A: run the static and dynamic layers, classify provisionally,
/// persist as `processing`, schedule Phase B, and return the record.
///
/// Persistence failure is the only fatal outcome — no partial records.
pub async fn run_analysis(
    state: &AppState,
    prompt: String,
    code: String,
) -> Result<AnalysisRecord, StorageError> {
    let mut logs: Vec<StageLog> = Vec::with_capacity(3);

    // Stage 1: static.
    let static_start = Instant::now();
    let static_report = match StaticAnalyzer::analyze(&code) {
        Ok(report) => {
            let mut log = StageLog::ok("static", static_start.elapsed().as_secs_f64());
            if !report.detector_errors.is_empty() {
                let notes: Vec<String> = report
                    .detector_errors
                    .iter()
                    .map(|(id, e)| format!("{id}: {e}"))
                    .collect();
                log.error = Some(notes.join("; "));
            }
            logs.push(log);
            report
        }
        Err(e) => {
            logs.push(StageLog::failed(
                "static",
                e.to_string(),
                static_start.elapsed().as_secs_f64(),
            ));
            StaticReport::default()
        }
    };

    // Stage 2: dynamic. Never raises; degradations land in the report.
    let dynamic_start = Instant::now();
    let dynamic_report = state
        .dynamic
        .analyze(&code, &static_report.parse.functions)
        .await;
    let mut dynamic_log = StageLog::ok("dynamic", dynamic_start.elapsed().as_secs_f64());
    if let Some(reason) = &dynamic_report.skipped_reason {
        dynamic_log.error = Some(format!("skipped: {reason}"));
    } else if dynamic_report.parse_error {
        dynamic_log.success = false;
        dynamic_log.error = Some("no harness JSON in sandbox output".to_string());
    }
    logs.push(dynamic_log);

    // Provisional classification with the linguistic signals still pending.
    let classify_start = Instant::now();
    let mut findings = classifier::classify(
        &static_report,
        &dynamic_report,
        &LinguisticReport::pending(),
    );
    explainer::embellish(&mut findings);
    let summary = explainer::generate_summary(&findings);
    logs.push(StageLog::ok(
        "classifier",
        classify_start.elapsed().as_secs_f64(),
    ));

    let record = state.store.create(
        &prompt,
        &code,
        TARGET_LANGUAGE,
        &findings,
        &logs,
        &summary,
    )?;

    info!(
        id = record.id,
        findings = record.findings.len(),
        severity = record.overall_severity,
        "analysis persisted, linguistic stage pending"
    );

    state.mark_in_progress(record.id);
    let task_state = state.clone();
    let task_prompt = prompt.clone();
    let task_code = code.clone();
    let id = record.id;
    tokio::spawn(async move {
        run_linguistic_background(
            task_state,
            id,
            task_prompt,
            task_code,
            static_report,
            dynamic_report,
        )
        .await;
    });

    Ok(record)
}

/// Phase B: the four linguistic detectors, re-classification with all
/// three signal sources, and the single completion update. Runs detached
/// from the caller's connection; a cancelled request never cancels it.
async fn run_linguistic_background(
    state: AppState,
    id: i64,
    prompt: String,
    code: String,
    static_report: StaticReport,
    dynamic_report: DynamicReport,
) {
    let started = Instant::now();
    let budget = std::time::Duration::from_secs(state.config.analysis.linguistic_budget());

    let input = LinguisticInput {
        prompt: &prompt,
        code: &code,
        report: &static_report,
    };
    let (linguistic_report, linguistic_log) =
        match tokio::time::timeout(budget, state.linguistic.analyze(&input)).await {
            Ok(report) => (
                report,
                StageLog::ok("linguistic", started.elapsed().as_secs_f64()),
            ),
            Err(_) => {
                warn!(id, "linguistic stage exceeded its budget");
                (
                    LinguisticReport::pending(),
                    StageLog::failed(
                        "linguistic",
                        "stage budget exceeded",
                        started.elapsed().as_secs_f64(),
                    ),
                )
            }
        };

    let mut findings = classifier::classify(&static_report, &dynamic_report, &linguistic_report);
    explainer::embellish(&mut findings);
    let summary = explainer::generate_summary(&findings);

    let extras = LinguisticExtras {
        intent_match_score: linguistic_report.intent_match_score,
        unprompted_features: linguistic_report.npc.items.clone(),
        missing_features: linguistic_report.missing_feature.items.clone(),
        hardcoded_values: linguistic_report.prompt_bias.items.clone(),
    };

    match state
        .store
        .complete(id, &findings, &summary, &extras, &linguistic_log)
    {
        Ok(()) => info!(
            id,
            findings = findings.len(),
            elapsed_s = started.elapsed().as_secs_f64(),
            "analysis complete"
        ),
        // The record stays `processing`; callers resolve it by timeout.
        Err(e) => error!(id, error = %e, "completion update failed"),
    }

    state.clear_in_progress(id);
}
