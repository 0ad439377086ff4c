//! High-level store used by the orchestrator.
//!
//! A single mutex-guarded connection. Single-writer-per-record is the
//! orchestrator's discipline, not the store's; the store only enforces
//! the one-shot status transition and the closed pattern contract.

use std::sync::Mutex;

use chrono::Utc;
use mirage_core::errors::StorageError;
use mirage_core::types::{
    AnalysisRecord, AnalysisStatus, Finding, LinguisticExtras, StageLog,
};
use rusqlite::Connection;

use crate::connection;
use crate::queries::{analyses, feedback, findings, linguistic, stage_logs, stats};

pub struct AnalysisStore {
    conn: Mutex<Connection>,
}

impl AnalysisStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(connection::open(path)?),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(connection::open_in_memory()?),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Persist a new record with `status = processing`. Everything is
    /// written in one transaction — on failure, no partial record exists.
    pub fn create(
        &self,
        prompt: &str,
        code: &str,
        language: &str,
        analysis_findings: &[Finding],
        logs: &[StageLog],
        summary: &str,
    ) -> Result<AnalysisRecord, StorageError> {
        let mut record = AnalysisRecord {
            id: 0,
            prompt: prompt.to_string(),
            code: code.to_string(),
            language: language.to_string(),
            status: AnalysisStatus::Processing,
            has_bugs: false,
            overall_severity: 0,
            confidence: 0.0,
            summary: summary.to_string(),
            findings: analysis_findings.to_vec(),
            stage_logs: logs.to_vec(),
            linguistic_extras: None,
            created_at: Utc::now(),
        };
        record.recompute_derived();

        let conn = self.lock();
        conn.execute_batch("BEGIN").map_err(StorageError::sqlite)?;
        let result = (|| {
            let id = analyses::insert_analysis(
                &conn,
                prompt,
                code,
                language,
                record.overall_severity,
                record.has_bugs,
                summary,
                record.confidence,
                &record.created_at,
            )?;
            findings::insert_findings(&conn, id, &record.findings)?;
            stage_logs::insert_stage_logs(&conn, id, logs)?;
            Ok(id)
        })();

        match result {
            Ok(id) => {
                conn.execute_batch("COMMIT").map_err(StorageError::sqlite)?;
                record.id = id;
                Ok(record)
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// The single completion update: replace the findings, write the
    /// linguistic details and stage log, and transition to `complete`.
    pub fn complete(
        &self,
        id: i64,
        final_findings: &[Finding],
        summary: &str,
        extras: &LinguisticExtras,
        linguistic_log: &StageLog,
    ) -> Result<(), StorageError> {
        let overall_severity = final_findings.iter().map(|f| f.severity).max().unwrap_or(0);
        let has_bugs = !final_findings.is_empty();
        let confidence = if final_findings.is_empty() {
            0.0
        } else {
            final_findings.iter().map(|f| f.confidence).sum::<f32>()
                / final_findings.len() as f32
        };

        let conn = self.lock();
        conn.execute_batch("BEGIN").map_err(StorageError::sqlite)?;
        let result = (|| {
            analyses::mark_complete(&conn, id, overall_severity, has_bugs, summary, confidence)?;
            findings::replace_findings(&conn, id, final_findings)?;
            linguistic::insert_details(&conn, id, extras)?;
            stage_logs::insert_stage_logs(&conn, id, std::slice::from_ref(linguistic_log))?;
            Ok(())
        })();

        match result {
            Ok(()) => conn.execute_batch("COMMIT").map_err(StorageError::sqlite),
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    pub fn get(&self, id: i64) -> Result<AnalysisRecord, StorageError> {
        let conn = self.lock();
        let row = analyses::get_analysis(&conn, id)?.ok_or(StorageError::NotFound { id })?;
        let record_findings = findings::load_findings(&conn, id)?;
        let logs = stage_logs::load_stage_logs(&conn, id)?;
        let extras = linguistic::load_details(&conn, id)?;
        Ok(AnalysisRecord {
            id: row.id,
            prompt: row.prompt,
            code: row.code,
            language: row.language,
            status: row.status,
            has_bugs: row.has_bugs,
            overall_severity: row.overall_severity,
            confidence: row.confidence,
            summary: row.summary,
            findings: record_findings,
            stage_logs: logs,
            linguistic_extras: extras,
            created_at: row.created_at,
        })
    }

    pub fn history(&self, limit: u32) -> Result<Vec<analyses::HistoryRow>, StorageError> {
        analyses::list_recent(&self.lock(), limit)
    }

    pub fn stats(&self) -> Result<stats::StatsReport, StorageError> {
        stats::gather(&self.lock())
    }

    pub fn add_feedback(
        &self,
        analysis_id: i64,
        rating: u8,
        comment: Option<&str>,
        helpful: bool,
    ) -> Result<i64, StorageError> {
        feedback::insert_feedback(&self.lock(), analysis_id, rating, comment, helpful)
    }

    pub fn delete(&self, id: i64) -> Result<bool, StorageError> {
        analyses::delete_analysis(&self.lock(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::types::{DetectionStage, Pattern};

    fn finding(pattern: Pattern, severity: u8, confidence: f32) -> Finding {
        Finding {
            pattern,
            severity,
            confidence,
            description: "d".to_string(),
            location: Some("Line 1".to_string()),
            fix_hint: None,
            detection_stage: DetectionStage::Static,
        }
    }

    #[test]
    fn create_then_get_round_trips() {
        let store = AnalysisStore::open_in_memory().unwrap();
        let created = store
            .create(
                "add",
                "def add(a,b): return a+b",
                "python",
                &[finding(Pattern::MissingCornerCase, 5, 0.6)],
                &[StageLog::ok("static", 0.01)],
                "summary",
            )
            .unwrap();
        assert!(created.id > 0);
        assert!(created.has_bugs);
        assert_eq!(created.overall_severity, 5);

        let loaded = store.get(created.id).unwrap();
        assert_eq!(loaded.status, AnalysisStatus::Processing);
        assert_eq!(loaded.findings.len(), 1);
        assert_eq!(loaded.findings[0].pattern, Pattern::MissingCornerCase);
        assert_eq!(loaded.stage_logs.len(), 1);
        assert!(loaded.linguistic_extras.is_none());
    }

    #[test]
    fn complete_transitions_exactly_once() {
        let store = AnalysisStore::open_in_memory().unwrap();
        let created = store
            .create("p", "c", "python", &[], &[], "pending")
            .unwrap();

        let extras = LinguisticExtras::default();
        let log = StageLog::ok("linguistic", 1.5);
        store
            .complete(
                created.id,
                &[finding(Pattern::Misinterpretation, 7, 0.8)],
                "final",
                &extras,
                &log,
            )
            .unwrap();

        let loaded = store.get(created.id).unwrap();
        assert_eq!(loaded.status, AnalysisStatus::Complete);
        assert_eq!(loaded.overall_severity, 7);
        assert!(loaded.linguistic_extras.is_some());

        // A second transition is refused.
        let err = store
            .complete(created.id, &[], "again", &extras, &log)
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn unknown_pattern_tag_refused_on_read() {
        let store = AnalysisStore::open_in_memory().unwrap();
        let created = store
            .create("p", "c", "python", &[], &[], "s")
            .unwrap();
        {
            let conn = store.lock();
            conn.execute(
                "INSERT INTO findings
                    (analysis_id, pattern, severity, confidence, description, detection_stage)
                 VALUES (?1, 'made_up_pattern', 5, 0.5, 'x', 'static')",
                rusqlite::params![created.id],
            )
            .unwrap();
        }
        let err = store.get(created.id).unwrap_err();
        assert!(matches!(err, StorageError::UnknownPattern { .. }));
    }

    #[test]
    fn delete_cascades_children() {
        let store = AnalysisStore::open_in_memory().unwrap();
        let created = store
            .create(
                "p",
                "c",
                "python",
                &[finding(Pattern::SillyMistake, 5, 0.5)],
                &[StageLog::ok("static", 0.0)],
                "s",
            )
            .unwrap();
        assert!(store.delete(created.id).unwrap());
        assert!(matches!(
            store.get(created.id),
            Err(StorageError::NotFound { .. })
        ));
        let conn = store.lock();
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM findings", [], |r| r.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn feedback_requires_existing_analysis() {
        let store = AnalysisStore::open_in_memory().unwrap();
        let err = store.add_feedback(999, 4, Some("nice"), true).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 999 }));

        let created = store.create("p", "c", "python", &[], &[], "s").unwrap();
        let feedback_id = store
            .add_feedback(created.id, 5, Some("helpful"), true)
            .unwrap();
        assert!(feedback_id > 0);
    }

    #[test]
    fn stats_aggregate_patterns() {
        let store = AnalysisStore::open_in_memory().unwrap();
        store
            .create(
                "p1",
                "c1",
                "python",
                &[
                    finding(Pattern::HallucinatedObject, 8, 0.9),
                    finding(Pattern::MissingCornerCase, 5, 0.6),
                ],
                &[StageLog::ok("static", 0.02)],
                "s",
            )
            .unwrap();
        store
            .create(
                "p2",
                "c2",
                "python",
                &[finding(Pattern::HallucinatedObject, 9, 0.95)],
                &[StageLog::failed("dynamic", "spawn failed", 0.1)],
                "s",
            )
            .unwrap();

        let report = store.stats().unwrap();
        assert_eq!(report.total_analyses, 2);
        assert_eq!(report.total_findings, 3);
        assert_eq!(report.analyses_with_bugs, 2);
        let hallucination = report
            .pattern_frequency
            .iter()
            .find(|p| p.pattern == "hallucinated_object")
            .unwrap();
        assert_eq!(hallucination.count, 2);
    }
}
