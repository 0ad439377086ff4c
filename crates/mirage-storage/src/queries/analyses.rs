//! analyses table queries.

use chrono::{DateTime, Utc};
use mirage_core::errors::StorageError;
use mirage_core::types::AnalysisStatus;
use rusqlite::{params, Connection, OptionalExtension};

/// A bare analyses row, before the child relations are attached.
#[derive(Debug, Clone)]
pub struct AnalysisRow {
    pub id: i64,
    pub prompt: String,
    pub code: String,
    pub language: String,
    pub status: AnalysisStatus,
    pub overall_severity: u8,
    pub has_bugs: bool,
    pub summary: String,
    pub confidence: f32,
    pub created_at: DateTime<Utc>,
}

/// One entry in the history listing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HistoryRow {
    pub id: i64,
    pub prompt: String,
    pub overall_severity: u8,
    pub has_bugs: bool,
    pub finding_count: i64,
    pub status: String,
    pub created_at: String,
}

pub fn insert_analysis(
    conn: &Connection,
    prompt: &str,
    code: &str,
    language: &str,
    overall_severity: u8,
    has_bugs: bool,
    summary: &str,
    confidence: f32,
    created_at: &DateTime<Utc>,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO analyses
            (prompt, code, language, status, overall_severity, has_bugs, summary, confidence, created_at)
         VALUES (?1, ?2, ?3, 'processing', ?4, ?5, ?6, ?7, ?8)",
        params![
            prompt,
            code,
            language,
            overall_severity as i64,
            has_bugs as i64,
            summary,
            confidence as f64,
            created_at.to_rfc3339(),
        ],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_analysis(conn: &Connection, id: i64) -> Result<Option<AnalysisRow>, StorageError> {
    conn.prepare_cached(
        "SELECT id, prompt, code, language, status, overall_severity, has_bugs,
                summary, confidence, created_at
         FROM analyses WHERE id = ?1",
    )
    .map_err(StorageError::sqlite)?
    .query_row(params![id], |row| {
        Ok(AnalysisRow {
            id: row.get(0)?,
            prompt: row.get(1)?,
            code: row.get(2)?,
            language: row.get(3)?,
            status: AnalysisStatus::from_tag(&row.get::<_, String>(4)?)
                .unwrap_or(AnalysisStatus::Processing),
            overall_severity: row.get::<_, i64>(5)? as u8,
            has_bugs: row.get::<_, i64>(6)? != 0,
            summary: row.get(7)?,
            confidence: row.get::<_, f64>(8)? as f32,
            created_at: parse_timestamp(&row.get::<_, String>(9)?),
        })
    })
    .optional()
    .map_err(StorageError::sqlite)
}

/// Perform the one-shot `processing → complete` transition. Returns an
/// error if the record does not exist or has already transitioned.
pub fn mark_complete(
    conn: &Connection,
    id: i64,
    overall_severity: u8,
    has_bugs: bool,
    summary: &str,
    confidence: f32,
) -> Result<(), StorageError> {
    let updated = conn
        .execute(
            "UPDATE analyses
             SET status = 'complete', overall_severity = ?2, has_bugs = ?3,
                 summary = ?4, confidence = ?5
             WHERE id = ?1 AND status = 'processing'",
            params![
                id,
                overall_severity as i64,
                has_bugs as i64,
                summary,
                confidence as f64
            ],
        )
        .map_err(StorageError::sqlite)?;
    if updated == 0 {
        return Err(StorageError::NotFound { id });
    }
    Ok(())
}

pub fn list_recent(conn: &Connection, limit: u32) -> Result<Vec<HistoryRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT a.id, a.prompt, a.overall_severity, a.has_bugs, a.status, a.created_at,
                    (SELECT COUNT(*) FROM findings f WHERE f.analysis_id = a.id)
             FROM analyses a
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT ?1",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map(params![limit], |row| {
            let prompt: String = row.get(1)?;
            Ok(HistoryRow {
                id: row.get(0)?,
                prompt: truncate(&prompt, 100),
                overall_severity: row.get::<_, i64>(2)? as u8,
                has_bugs: row.get::<_, i64>(3)? != 0,
                status: row.get(4)?,
                created_at: row.get(5)?,
                finding_count: row.get(6)?,
            })
        })
        .map_err(StorageError::sqlite)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(StorageError::sqlite)?);
    }
    Ok(out)
}

pub fn delete_analysis(conn: &Connection, id: i64) -> Result<bool, StorageError> {
    let deleted = conn
        .execute("DELETE FROM analyses WHERE id = ?1", params![id])
        .map_err(StorageError::sqlite)?;
    Ok(deleted > 0)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
