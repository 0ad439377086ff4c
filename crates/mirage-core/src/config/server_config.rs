//! Server, storage, and analysis-budget configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServerConfig {
    pub fn resolved_host(&self) -> &str {
        self.host.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn resolved_port(&self) -> u16 {
        self.port.unwrap_or(8000)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: Option<String>,
}

impl StorageConfig {
    pub fn resolved_db_path(&self) -> &str {
        self.db_path.as_deref().unwrap_or("mirage.db")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Per-attempt timeout for external model calls.
    pub provider_timeout_s: Option<u64>,
    /// Budget for the whole linguistic stage.
    pub linguistic_budget_s: Option<u64>,
    /// Largest accepted target program.
    pub max_code_bytes: Option<usize>,
}

impl AnalysisConfig {
    pub fn provider_timeout(&self) -> u64 {
        self.provider_timeout_s.unwrap_or(30)
    }

    pub fn linguistic_budget(&self) -> u64 {
        self.linguistic_budget_s.unwrap_or(120)
    }

    pub fn max_code(&self) -> usize {
        self.max_code_bytes.unwrap_or(256 * 1024)
    }
}
