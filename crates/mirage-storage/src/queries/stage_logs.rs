//! stage_logs table queries.

use mirage_core::errors::StorageError;
use mirage_core::types::StageLog;
use rusqlite::{params, Connection};

pub fn insert_stage_logs(
    conn: &Connection,
    analysis_id: i64,
    logs: &[StageLog],
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO stage_logs (analysis_id, stage_name, success, error, elapsed_s)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(StorageError::sqlite)?;
    for log in logs {
        stmt.execute(params![
            analysis_id,
            log.stage,
            log.success as i64,
            log.error,
            log.elapsed_seconds,
        ])
        .map_err(StorageError::sqlite)?;
    }
    Ok(())
}

pub fn load_stage_logs(conn: &Connection, analysis_id: i64) -> Result<Vec<StageLog>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT stage_name, success, error, elapsed_s
             FROM stage_logs WHERE analysis_id = ?1 ORDER BY id",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map(params![analysis_id], |row| {
            Ok(StageLog {
                stage: row.get(0)?,
                success: row.get::<_, i64>(1)? != 0,
                error: row.get(2)?,
                elapsed_seconds: row.get(3)?,
            })
        })
        .map_err(StorageError::sqlite)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(StorageError::sqlite)?);
    }
    Ok(out)
}
