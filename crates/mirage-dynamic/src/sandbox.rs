//! Sandbox executor — isolated execution with wall, memory, and network
//! limits.
//!
//! Two backends share one observable contract. The strong backend runs the
//! program in a container (no network, memory cap, CPU share, read-only
//! bind of the scratch directory). The weak backend is a plain subprocess
//! guarded by an import deny-set; it is safety-enough for analysis, not a
//! security boundary. Container unavailability degrades to the weak
//! backend; timeouts come back as structured outcomes, never as errors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use mirage_core::config::{SandboxBackend, SandboxConfig};
use mirage_core::errors::SandboxError;
use regex::RegexSet;
use std::sync::OnceLock;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Modules whose import disqualifies a program from subprocess execution:
/// shell access, process spawning, sockets, threads, and file deletion.
pub const DENY_IMPORTS: &[&str] = &[
    "os",
    "subprocess",
    "shutil",
    "socket",
    "ctypes",
    "multiprocessing",
    "threading",
    "signal",
    "pty",
    "tty",
    "termios",
    "resource",
];

fn deny_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| {
        let patterns: Vec<String> = DENY_IMPORTS
            .iter()
            .map(|m| format!(r"(?m)^\s*(?:import\s+{m}\b|from\s+{m}\b)"))
            .collect();
        RegexSet::new(&patterns).expect("static deny patterns")
    })
}

/// Find the first denied import in the source, if any.
pub fn denied_import(source: &str) -> Option<&'static str> {
    deny_set()
        .matches(source)
        .into_iter()
        .next()
        .map(|idx| DENY_IMPORTS[idx])
}

/// Outcome of one sandbox run. Timeout is a flag, not an error.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct SandboxExecutor {
    config: SandboxConfig,
    container_ok: OnceCell<bool>,
}

impl SandboxExecutor {
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            config,
            container_ok: OnceCell::new(),
        }
    }

    pub fn backend(&self) -> SandboxBackend {
        self.config.resolved_backend()
    }

    /// Execute a staged Python script under the configured isolation.
    ///
    /// The supplied source runs in a fresh process whose filesystem,
    /// memory, and network are isolated from the host; execution is
    /// bounded by the configured wall timeout, and stdout is captured
    /// verbatim including interleaved user prints.
    pub async fn run(&self, source: &str) -> Result<ExecutionResult, SandboxError> {
        match self.config.resolved_backend() {
            SandboxBackend::Disabled => Err(SandboxError::Disabled),
            SandboxBackend::Subprocess => self.run_subprocess(source).await,
            SandboxBackend::Container => {
                if self.container_available().await {
                    match self.run_container(source).await {
                        Ok(result) => Ok(result),
                        Err(e) => {
                            warn!(error = %e, "container run failed, degrading to subprocess");
                            self.run_subprocess(source).await
                        }
                    }
                } else {
                    debug!("container runtime unavailable, using subprocess backend");
                    self.run_subprocess(source).await
                }
            }
        }
    }

    async fn container_available(&self) -> bool {
        *self
            .container_ok
            .get_or_init(|| async {
                Command::new("docker")
                    .arg("version")
                    .output()
                    .await
                    .map(|o| o.status.success())
                    .unwrap_or(false)
            })
            .await
    }

    async fn run_container(&self, source: &str) -> Result<ExecutionResult, SandboxError> {
        let dir = tempfile::tempdir().map_err(|e| SandboxError::StagingFailed {
            message: e.to_string(),
        })?;
        let script = dir.path().join("harness.py");
        std::fs::write(&script, source).map_err(|e| SandboxError::StagingFailed {
            message: e.to_string(),
        })?;

        let run_id = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!("mirage-sbx-{}-{run_id}", std::process::id());
        let memory_mb = self.config.memory() / (1024 * 1024);
        let mount = format!("{}:/code:ro", dir.path().display());

        let mut cmd = Command::new("docker");
        cmd.args(["run", "--rm", "--name", &name])
            .args(["--network", "none"])
            .args(["--memory", &format!("{memory_mb}m")])
            .args(["--cpus", "0.5"])
            .arg("--read-only")
            .args(["-v", &mount])
            .arg(self.config.image_name())
            .args(["python", "/code/harness.py"])
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| SandboxError::ContainerUnavailable {
            message: e.to_string(),
        })?;

        let wall = Duration::from_secs(self.config.wall_timeout());
        match tokio::time::timeout(wall, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ExecutionResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code(),
                timed_out: false,
            }),
            Ok(Err(e)) => Err(SandboxError::SpawnFailed {
                message: e.to_string(),
            }),
            Err(_) => {
                // The docker CLI child is killed on drop; the container
                // itself needs an explicit kill.
                let _ = Command::new("docker").args(["kill", &name]).output().await;
                Ok(ExecutionResult {
                    timed_out: true,
                    ..Default::default()
                })
            }
        }
    }

    async fn run_subprocess(&self, source: &str) -> Result<ExecutionResult, SandboxError> {
        if let Some(module) = denied_import(source) {
            return Err(SandboxError::DeniedImport {
                module: module.to_string(),
            });
        }

        let file = tempfile::Builder::new()
            .prefix("mirage-harness-")
            .suffix(".py")
            .tempfile()
            .map_err(|e| SandboxError::StagingFailed {
                message: e.to_string(),
            })?;
        std::fs::write(file.path(), source).map_err(|e| SandboxError::StagingFailed {
            message: e.to_string(),
        })?;

        let mut cmd = Command::new(self.config.python());
        cmd.arg(file.path())
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| SandboxError::SpawnFailed {
            message: e.to_string(),
        })?;

        let wall = Duration::from_secs(self.config.wall_timeout());
        match tokio::time::timeout(wall, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ExecutionResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code(),
                timed_out: false,
            }),
            Ok(Err(e)) => Err(SandboxError::SpawnFailed {
                message: e.to_string(),
            }),
            Err(_) => Ok(ExecutionResult {
                timed_out: true,
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_set_catches_plain_import() {
        assert_eq!(denied_import("import os\nprint(1)\n"), Some("os"));
        assert_eq!(denied_import("from socket import socket\n"), Some("socket"));
    }

    #[test]
    fn deny_set_ignores_lookalikes() {
        // Module names embedded in longer identifiers do not match.
        assert_eq!(denied_import("import ossify\n"), None);
        assert_eq!(denied_import("from sockets_util import x\n"), None);
        assert_eq!(denied_import("x = 'import os'\n"), None);
    }

    #[test]
    fn deny_set_clean_code_passes() {
        assert_eq!(denied_import("import math\n\ndef f():\n    return 1\n"), None);
    }

    #[tokio::test]
    async fn disabled_backend_refuses() {
        let config = SandboxConfig {
            backend: Some(SandboxBackend::Disabled),
            ..Default::default()
        };
        let executor = SandboxExecutor::new(config);
        let err = executor.run("print(1)").await.unwrap_err();
        assert!(matches!(err, SandboxError::Disabled));
    }

    #[tokio::test]
    async fn subprocess_backend_denies_thread_import() {
        let config = SandboxConfig {
            backend: Some(SandboxBackend::Subprocess),
            ..Default::default()
        };
        let executor = SandboxExecutor::new(config);
        let err = executor.run("import threading\n").await.unwrap_err();
        assert!(matches!(err, SandboxError::DeniedImport { .. }));
    }
}
