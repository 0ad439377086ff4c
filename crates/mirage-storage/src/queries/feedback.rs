//! feedback table queries.

use mirage_core::errors::StorageError;
use rusqlite::{params, Connection};

pub fn insert_feedback(
    conn: &Connection,
    analysis_id: i64,
    rating: u8,
    comment: Option<&str>,
    helpful: bool,
) -> Result<i64, StorageError> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM analyses WHERE id = ?1)",
            params![analysis_id],
            |row| row.get(0),
        )
        .map_err(StorageError::sqlite)?;
    if !exists {
        return Err(StorageError::NotFound { id: analysis_id });
    }

    conn.execute(
        "INSERT INTO feedback (analysis_id, rating, comment, helpful)
         VALUES (?1, ?2, ?3, ?4)",
        params![analysis_id, rating as i64, comment, helpful as i64],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}
