//! Sandbox backend configuration.

use serde::{Deserialize, Serialize};

/// Which isolation backend executes the target program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxBackend {
    /// Strong isolation: container with memory/CPU caps and no network.
    Container,
    /// Weak isolation: plain subprocess guarded by the import deny-set.
    Subprocess,
    /// Dynamic layer skipped entirely.
    Disabled,
}

impl SandboxBackend {
    pub fn from_tag(tag: &str) -> Option<SandboxBackend> {
        match tag {
            "container" => Some(Self::Container),
            "subprocess" => Some(Self::Subprocess),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Subprocess => "subprocess",
            Self::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub backend: Option<SandboxBackend>,
    pub wall_timeout_s: Option<u64>,
    pub memory_bytes: Option<u64>,
    /// Container image for the strong backend.
    pub image: Option<String>,
    /// Interpreter binary for the weak backend.
    pub python_bin: Option<String>,
}

impl SandboxConfig {
    pub fn resolved_backend(&self) -> SandboxBackend {
        self.backend.unwrap_or(SandboxBackend::Container)
    }

    pub fn wall_timeout(&self) -> u64 {
        self.wall_timeout_s.unwrap_or(10)
    }

    pub fn memory(&self) -> u64 {
        self.memory_bytes.unwrap_or(128 * 1024 * 1024)
    }

    pub fn image_name(&self) -> &str {
        self.image.as_deref().unwrap_or("python:3.11-slim")
    }

    pub fn python(&self) -> &str {
        self.python_bin.as_deref().unwrap_or("python3")
    }
}
