//! Harness output parsing.

use serde::Deserialize;

/// The JSON object the harness prints as its final stdout line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarnessOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// Scan stdout from the last line upward and return the first line that
/// parses as a JSON object. User code may interleave arbitrary prints and
/// warnings before the harness line; those are tolerated.
pub fn parse_last_json(stdout: &str) -> Option<HarnessOutcome> {
    for line in stdout.lines().rev() {
        let trimmed = line.trim();
        if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
            continue;
        }
        if let Ok(outcome) = serde_json::from_str::<HarnessOutcome>(trimmed) {
            return Some(outcome);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_final_json_line() {
        let stdout = "debug print from user code\n{\"success\": true, \"output\": \"executed\"}\n";
        let outcome = parse_last_json(stdout).unwrap();
        assert!(outcome.success);
    }

    #[test]
    fn tolerates_interleaved_noise() {
        let stdout = "{not json\nDeprecationWarning: something\n{\"success\": false, \"error\": \"division by zero\", \"error_type\": \"ZeroDivisionError\", \"line\": 2}\ntrailing noise";
        let outcome = parse_last_json(stdout).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error_type.as_deref(), Some("ZeroDivisionError"));
        assert_eq!(outcome.line, Some(2));
    }

    #[test]
    fn last_json_wins_over_earlier_json() {
        let stdout = "{\"success\": false}\n{\"success\": true}\n";
        let outcome = parse_last_json(stdout).unwrap();
        assert!(outcome.success);
    }

    #[test]
    fn no_json_is_none() {
        assert!(parse_last_json("plain output\nno json here\n").is_none());
        assert!(parse_last_json("").is_none());
    }
}
