//! findings table queries.
//!
//! The pattern column is a closed contract: writes go through the typed
//! [`Pattern`] enum, and reads refuse rows whose tag no longer parses.

use mirage_core::errors::StorageError;
use mirage_core::types::{DetectionStage, Finding, Pattern};
use rusqlite::{params, Connection};

pub fn insert_findings(
    conn: &Connection,
    analysis_id: i64,
    findings: &[Finding],
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO findings
                (analysis_id, pattern, severity, confidence, description, location,
                 fix_hint, detection_stage)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(StorageError::sqlite)?;
    for finding in findings {
        stmt.execute(params![
            analysis_id,
            finding.pattern.tag(),
            finding.severity as i64,
            finding.confidence as f64,
            finding.description,
            finding.location,
            finding.fix_hint,
            finding.detection_stage.tag(),
        ])
        .map_err(StorageError::sqlite)?;
    }
    Ok(())
}

/// Replace the preliminary finding set with the complete one.
pub fn replace_findings(
    conn: &Connection,
    analysis_id: i64,
    findings: &[Finding],
) -> Result<(), StorageError> {
    conn.execute(
        "DELETE FROM findings WHERE analysis_id = ?1",
        params![analysis_id],
    )
    .map_err(StorageError::sqlite)?;
    insert_findings(conn, analysis_id, findings)
}

pub fn load_findings(conn: &Connection, analysis_id: i64) -> Result<Vec<Finding>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT pattern, severity, confidence, description, location, fix_hint,
                    detection_stage
             FROM findings WHERE analysis_id = ?1 ORDER BY id",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map(params![analysis_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .map_err(StorageError::sqlite)?;

    let mut out = Vec::new();
    for row in rows {
        let (tag, severity, confidence, description, location, fix_hint, stage) =
            row.map_err(StorageError::sqlite)?;
        let pattern = Pattern::from_tag(&tag).ok_or(StorageError::UnknownPattern { tag })?;
        let detection_stage =
            DetectionStage::from_tag(&stage).ok_or(StorageError::UnknownPattern { tag: stage })?;
        out.push(Finding {
            pattern,
            severity: severity as u8,
            confidence: confidence as f32,
            description,
            location,
            fix_hint,
            detection_stage,
        });
    }
    Ok(out)
}
