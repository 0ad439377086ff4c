//! Dynamic analyzer — wrap, execute, classify.

use mirage_analysis::parser::types::FunctionInfo;
use mirage_core::config::{SandboxBackend, SandboxConfig};
use mirage_core::errors::SandboxError;
use mirage_core::types::{DynamicReport, Pattern, RuntimeHypothesis};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::harness;
use crate::output::{parse_last_json, HarnessOutcome};
use crate::sandbox::{denied_import, SandboxExecutor};

fn name_error_subject() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"name '([A-Za-z_][A-Za-z0-9_]*)'").expect("static regex"))
}

pub struct DynamicAnalyzer {
    sandbox: SandboxExecutor,
}

impl DynamicAnalyzer {
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            sandbox: SandboxExecutor::new(config),
        }
    }

    /// Execute the target program under instrumentation and map its first
    /// uncaught exception to a pattern hypothesis. This never returns an
    /// error: every failure mode degrades to a structured report.
    pub async fn analyze(&self, code: &str, functions: &[FunctionInfo]) -> DynamicReport {
        if code.trim().is_empty() {
            return DynamicReport::skipped("empty program");
        }

        // The weak backend refuses denied imports; check the raw program
        // before it is embedded in the harness string literal.
        if self.sandbox.backend() != SandboxBackend::Container {
            if let Some(module) = denied_import(code) {
                return DynamicReport::skipped(format!(
                    "program imports denied module '{module}'"
                ));
            }
        }

        let wrapped = harness::build(code, functions);
        match self.sandbox.run(&wrapped).await {
            Ok(result) if result.timed_out => DynamicReport {
                executed: true,
                skipped_reason: None,
                success: false,
                timed_out: true,
                parse_error: false,
                hypothesis: Some(RuntimeHypothesis {
                    pattern: Pattern::MissingCornerCase,
                    severity: 3,
                    error_kind: "TimeoutError".to_string(),
                    message: "execution exceeded the wall timeout".to_string(),
                    line: None,
                    unresolved_name: None,
                }),
            },
            Ok(result) => match parse_last_json(&result.stdout) {
                Some(outcome) => classify(outcome),
                None => {
                    debug!(stdout = %result.stdout, "no harness JSON in sandbox output");
                    DynamicReport {
                        executed: true,
                        skipped_reason: None,
                        success: false,
                        timed_out: false,
                        parse_error: true,
                        hypothesis: None,
                    }
                }
            },
            Err(SandboxError::Disabled) => DynamicReport::skipped("sandbox backend disabled"),
            Err(SandboxError::DeniedImport { module }) => {
                DynamicReport::skipped(format!("program imports denied module '{module}'"))
            }
            Err(e) => {
                warn!(error = %e, "dynamic layer degraded to skip");
                DynamicReport::skipped(e.to_string())
            }
        }
    }
}

/// Map the harness outcome to a pattern hypothesis per the exception table.
fn classify(outcome: HarnessOutcome) -> DynamicReport {
    if outcome.success {
        return DynamicReport {
            executed: true,
            skipped_reason: None,
            success: true,
            timed_out: false,
            parse_error: false,
            hypothesis: None,
        };
    }

    let error_kind = outcome.error_type.clone().unwrap_or_default();
    let message = outcome.error.clone().unwrap_or_default();
    let (pattern, severity) = match error_kind.as_str() {
        "AttributeError" => (Pattern::WrongAttribute, 6),
        "TypeError" => (Pattern::WrongInputType, 6),
        "NameError" => (Pattern::HallucinatedObject, 8),
        "ZeroDivisionError" => (Pattern::MissingCornerCase, 5),
        "IndexError" | "KeyError" | "ValueError" => (Pattern::MissingCornerCase, 5),
        _ => (Pattern::MissingCornerCase, 4),
    };

    let unresolved_name = if error_kind == "NameError" {
        name_error_subject()
            .captures(&message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    } else {
        None
    };

    DynamicReport {
        executed: true,
        skipped_reason: None,
        success: false,
        timed_out: false,
        parse_error: false,
        hypothesis: Some(RuntimeHypothesis {
            pattern,
            severity,
            error_kind,
            message,
            line: outcome.line,
            unresolved_name,
        }),
    }
}
