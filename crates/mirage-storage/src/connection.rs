//! Connection setup and PRAGMA configuration.

use mirage_core::errors::StorageError;
use rusqlite::Connection;

/// Apply performance and safety pragmas to a connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| StorageError::sqlite(format!("failed to apply pragmas: {e}")))
}

/// Open (or create) the database at `path`, apply pragmas, run migrations.
pub fn open(path: &str) -> Result<Connection, StorageError> {
    let conn = Connection::open(path).map_err(StorageError::sqlite)?;
    apply_pragmas(&conn)?;
    crate::migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// In-memory database for tests. WAL does not apply to `:memory:`; the
/// remaining pragmas and the migration ladder are identical.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory().map_err(StorageError::sqlite)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(StorageError::sqlite)?;
    crate::migrations::run_migrations(&conn)?;
    Ok(conn)
}
