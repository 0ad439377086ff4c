//! V001: the five core relations.

pub const MIGRATION_SQL: &str = r#"
-- One row per (prompt, code) submission.
CREATE TABLE IF NOT EXISTS analyses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prompt TEXT NOT NULL,
    code TEXT NOT NULL,
    language TEXT NOT NULL DEFAULT 'python',
    status TEXT NOT NULL DEFAULT 'processing'
        CHECK (status IN ('processing', 'complete')),
    overall_severity INTEGER NOT NULL DEFAULT 0
        CHECK (overall_severity BETWEEN 0 AND 10),
    has_bugs INTEGER NOT NULL DEFAULT 0,
    summary TEXT NOT NULL DEFAULT '',
    confidence REAL NOT NULL DEFAULT 0.0,
    created_at TEXT NOT NULL
) STRICT;

-- Classified defects for an analysis.
CREATE TABLE IF NOT EXISTS findings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analysis_id INTEGER NOT NULL REFERENCES analyses(id) ON DELETE CASCADE,
    pattern TEXT NOT NULL,
    severity INTEGER NOT NULL CHECK (severity BETWEEN 0 AND 10),
    confidence REAL NOT NULL,
    description TEXT NOT NULL,
    location TEXT,
    fix_hint TEXT,
    detection_stage TEXT NOT NULL
        CHECK (detection_stage IN ('static', 'dynamic', 'linguistic', 'composite'))
) STRICT;

CREATE INDEX IF NOT EXISTS idx_findings_analysis ON findings(analysis_id);
CREATE INDEX IF NOT EXISTS idx_findings_pattern ON findings(pattern);

-- Per-stage timing and outcome.
CREATE TABLE IF NOT EXISTS stage_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analysis_id INTEGER NOT NULL REFERENCES analyses(id) ON DELETE CASCADE,
    stage_name TEXT NOT NULL,
    success INTEGER NOT NULL,
    error TEXT,
    elapsed_s REAL NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_stage_logs_analysis ON stage_logs(analysis_id);

-- Structured dump of the four linguistic detectors.
CREATE TABLE IF NOT EXISTS linguistic_details (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analysis_id INTEGER NOT NULL REFERENCES analyses(id) ON DELETE CASCADE,
    intent_match_score REAL NOT NULL,
    unprompted_features TEXT NOT NULL DEFAULT '[]',
    missing_features TEXT NOT NULL DEFAULT '[]',
    hardcoded_values TEXT NOT NULL DEFAULT '[]'
) STRICT;

CREATE INDEX IF NOT EXISTS idx_linguistic_analysis ON linguistic_details(analysis_id);

-- User feedback on an analysis.
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analysis_id INTEGER NOT NULL REFERENCES analyses(id) ON DELETE CASCADE,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    comment TEXT,
    helpful INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE INDEX IF NOT EXISTS idx_feedback_analysis ON feedback(analysis_id);
"#;
