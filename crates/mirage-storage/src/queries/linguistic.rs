//! linguistic_details table queries. The three feature lists are stored
//! as serialized JSON arrays.

use mirage_core::errors::StorageError;
use mirage_core::types::LinguisticExtras;
use rusqlite::{params, Connection, OptionalExtension};

pub fn insert_details(
    conn: &Connection,
    analysis_id: i64,
    extras: &LinguisticExtras,
) -> Result<(), StorageError> {
    let encode = |list: &Vec<String>| {
        serde_json::to_string(list).map_err(|e| StorageError::sqlite(e.to_string()))
    };
    conn.execute(
        "INSERT INTO linguistic_details
            (analysis_id, intent_match_score, unprompted_features, missing_features,
             hardcoded_values)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            analysis_id,
            extras.intent_match_score as f64,
            encode(&extras.unprompted_features)?,
            encode(&extras.missing_features)?,
            encode(&extras.hardcoded_values)?,
        ],
    )
    .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn load_details(
    conn: &Connection,
    analysis_id: i64,
) -> Result<Option<LinguisticExtras>, StorageError> {
    conn.prepare_cached(
        "SELECT intent_match_score, unprompted_features, missing_features, hardcoded_values
         FROM linguistic_details WHERE analysis_id = ?1
         ORDER BY id DESC LIMIT 1",
    )
    .map_err(StorageError::sqlite)?
    .query_row(params![analysis_id], |row| {
        let decode = |raw: String| serde_json::from_str::<Vec<String>>(&raw).unwrap_or_default();
        Ok(LinguisticExtras {
            intent_match_score: row.get::<_, f64>(0)? as f32,
            unprompted_features: decode(row.get(1)?),
            missing_features: decode(row.get(2)?),
            hardcoded_values: decode(row.get(3)?),
        })
    })
    .optional()
    .map_err(StorageError::sqlite)
}
