//! Layered configuration.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`MIRAGE_*`)
//! 2. Project config (`mirage.toml` in the working directory)
//! 3. User config (`~/.mirage/config.toml`)
//! 4. Compiled defaults

pub mod provider_config;
pub mod sandbox_config;
pub mod server_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use provider_config::{ProviderEndpoint, ProvidersConfig};
pub use sandbox_config::{SandboxBackend, SandboxConfig};
pub use server_config::{AnalysisConfig, ServerConfig, StorageConfig};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirageConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub sandbox: SandboxConfig,
    pub providers: ProvidersConfig,
    pub analysis: AnalysisConfig,
}

impl MirageConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_path) = user_config_path() {
            if user_path.exists() {
                merge_toml_file(&mut config, &user_path)?;
            }
        }

        let project_path = root.join("mirage.toml");
        if project_path.exists() {
            merge_toml_file(&mut config, &project_path)?;
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string directly (used by tests).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: MirageConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::ParseFailed {
                path: "<string>".to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `other` into `self`: `other` wins wherever it carries a value.
    fn merge(&mut self, other: MirageConfig) {
        if other.server.host.is_some() {
            self.server.host = other.server.host;
        }
        if other.server.port.is_some() {
            self.server.port = other.server.port;
        }
        if other.storage.db_path.is_some() {
            self.storage.db_path = other.storage.db_path;
        }
        if other.sandbox.backend.is_some() {
            self.sandbox.backend = other.sandbox.backend;
        }
        if other.sandbox.wall_timeout_s.is_some() {
            self.sandbox.wall_timeout_s = other.sandbox.wall_timeout_s;
        }
        if other.sandbox.memory_bytes.is_some() {
            self.sandbox.memory_bytes = other.sandbox.memory_bytes;
        }
        if other.sandbox.image.is_some() {
            self.sandbox.image = other.sandbox.image;
        }
        if other.sandbox.python_bin.is_some() {
            self.sandbox.python_bin = other.sandbox.python_bin;
        }
        if other.providers.primary.is_some() {
            self.providers.primary = other.providers.primary;
        }
        if other.providers.fallback.is_some() {
            self.providers.fallback = other.providers.fallback;
        }
        if other.analysis.provider_timeout_s.is_some() {
            self.analysis.provider_timeout_s = other.analysis.provider_timeout_s;
        }
        if other.analysis.linguistic_budget_s.is_some() {
            self.analysis.linguistic_budget_s = other.analysis.linguistic_budget_s;
        }
        if other.analysis.max_code_bytes.is_some() {
            self.analysis.max_code_bytes = other.analysis.max_code_bytes;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `MIRAGE_PORT`, `MIRAGE_DB_PATH`, `MIRAGE_SANDBOX_BACKEND`, ...
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MIRAGE_HOST") {
            self.server.host = Some(val);
        }
        if let Ok(val) = std::env::var("MIRAGE_PORT") {
            if let Ok(v) = val.parse::<u16>() {
                self.server.port = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MIRAGE_DB_PATH") {
            self.storage.db_path = Some(val);
        }
        if let Ok(val) = std::env::var("MIRAGE_SANDBOX_BACKEND") {
            if let Some(b) = SandboxBackend::from_tag(&val) {
                self.sandbox.backend = Some(b);
            }
        }
        if let Ok(val) = std::env::var("MIRAGE_SANDBOX_TIMEOUT_S") {
            if let Ok(v) = val.parse::<u64>() {
                self.sandbox.wall_timeout_s = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MIRAGE_PYTHON_BIN") {
            self.sandbox.python_bin = Some(val);
        }
        if let Ok(val) = std::env::var("MIRAGE_PROVIDER_TIMEOUT_S") {
            if let Ok(v) = val.parse::<u64>() {
                self.analysis.provider_timeout_s = Some(v);
            }
        }
    }

    /// Validate the resolved configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeout = self.sandbox.wall_timeout();
        if !(1..=60).contains(&timeout) {
            return Err(ConfigError::ValidationFailed {
                field: "sandbox.wall_timeout_s".to_string(),
                message: "must be between 1 and 60".to_string(),
            });
        }
        if self.sandbox.memory() < 16 * 1024 * 1024 {
            return Err(ConfigError::ValidationFailed {
                field: "sandbox.memory_bytes".to_string(),
                message: "must be at least 16 MiB".to_string(),
            });
        }
        let budget = self.analysis.linguistic_budget();
        if !(1..=600).contains(&budget) {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.linguistic_budget_s".to_string(),
                message: "must be between 1 and 600".to_string(),
            });
        }
        if self.analysis.provider_timeout() > budget {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.provider_timeout_s".to_string(),
                message: "must not exceed the linguistic stage budget".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the user config path: `~/.mirage/config.toml`.
fn user_config_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".mirage").join("config.toml"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}

fn merge_toml_file(config: &mut MirageConfig, path: &Path) -> Result<(), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.display().to_string(),
    })?;
    let file_config: MirageConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    config.merge(file_config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MirageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sandbox.wall_timeout(), 10);
        assert_eq!(config.sandbox.resolved_backend(), SandboxBackend::Container);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = MirageConfig::from_toml(
            r#"
            [sandbox]
            backend = "subprocess"
            wall_timeout_s = 5

            [server]
            port = 9001
            "#,
        )
        .unwrap();
        assert_eq!(config.sandbox.resolved_backend(), SandboxBackend::Subprocess);
        assert_eq!(config.sandbox.wall_timeout(), 5);
        assert_eq!(config.server.resolved_port(), 9001);
    }

    #[test]
    fn out_of_range_timeout_rejected() {
        let err = MirageConfig::from_toml("[sandbox]\nwall_timeout_s = 600\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    }

    #[test]
    fn provider_endpoints_parse() {
        let config = MirageConfig::from_toml(
            r#"
            [providers.primary]
            name = "ollama"
            endpoint = "https://ollama.example/v1/chat/completions"
            model = "gpt-oss:20b"
            api_key_env = "MIRAGE_PRIMARY_KEY"

            [providers.fallback]
            name = "openrouter"
            endpoint = "https://openrouter.ai/api/v1/chat/completions"
            model = "google/gemma-3-12b-it:free"
            api_key_env = "MIRAGE_FALLBACK_KEY"
            "#,
        )
        .unwrap();
        let primary = config.providers.primary.unwrap();
        assert_eq!(primary.name, "ollama");
        assert!(config.providers.fallback.is_some());
    }
}
