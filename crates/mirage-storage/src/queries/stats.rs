//! Aggregate statistics across all analyses.

use mirage_core::errors::StorageError;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PatternFrequency {
    pub pattern: String,
    pub count: i64,
    pub avg_severity: f64,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageDistribution {
    pub stage: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StagePerformance {
    pub stage: String,
    pub success_rate: f64,
    pub avg_elapsed_s: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub total_analyses: i64,
    pub total_findings: i64,
    pub analyses_with_bugs: i64,
    pub pattern_frequency: Vec<PatternFrequency>,
    pub detection_stages: Vec<StageDistribution>,
    pub stage_performance: Vec<StagePerformance>,
}

pub fn gather(conn: &Connection) -> Result<StatsReport, StorageError> {
    let scalar = |sql: &str| -> Result<i64, StorageError> {
        conn.query_row(sql, [], |row| row.get(0))
            .map_err(StorageError::sqlite)
    };

    let total_analyses = scalar("SELECT COUNT(*) FROM analyses")?;
    let total_findings = scalar("SELECT COUNT(*) FROM findings")?;
    let analyses_with_bugs = scalar("SELECT COUNT(*) FROM analyses WHERE has_bugs = 1")?;

    let mut pattern_frequency = Vec::new();
    {
        let mut stmt = conn
            .prepare_cached(
                "SELECT pattern, COUNT(*), AVG(severity), AVG(confidence)
                 FROM findings GROUP BY pattern ORDER BY COUNT(*) DESC",
            )
            .map_err(StorageError::sqlite)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(PatternFrequency {
                    pattern: row.get(0)?,
                    count: row.get(1)?,
                    avg_severity: row.get(2)?,
                    avg_confidence: row.get(3)?,
                })
            })
            .map_err(StorageError::sqlite)?;
        for row in rows {
            pattern_frequency.push(row.map_err(StorageError::sqlite)?);
        }
    }

    let mut detection_stages = Vec::new();
    {
        let mut stmt = conn
            .prepare_cached(
                "SELECT detection_stage, COUNT(*) FROM findings
                 GROUP BY detection_stage ORDER BY COUNT(*) DESC",
            )
            .map_err(StorageError::sqlite)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StageDistribution {
                    stage: row.get(0)?,
                    count: row.get(1)?,
                })
            })
            .map_err(StorageError::sqlite)?;
        for row in rows {
            detection_stages.push(row.map_err(StorageError::sqlite)?);
        }
    }

    let mut stage_performance = Vec::new();
    {
        let mut stmt = conn
            .prepare_cached(
                "SELECT stage_name, AVG(success), AVG(elapsed_s)
                 FROM stage_logs GROUP BY stage_name",
            )
            .map_err(StorageError::sqlite)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StagePerformance {
                    stage: row.get(0)?,
                    success_rate: row.get(1)?,
                    avg_elapsed_s: row.get(2)?,
                })
            })
            .map_err(StorageError::sqlite)?;
        for row in rows {
            stage_performance.push(row.map_err(StorageError::sqlite)?);
        }
    }

    Ok(StatsReport {
        total_analyses,
        total_findings,
        analyses_with_bugs,
        pattern_frequency,
        detection_stages,
        stage_performance,
    })
}
