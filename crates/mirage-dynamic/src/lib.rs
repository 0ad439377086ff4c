//! Mirage dynamic layer — sandboxed execution and runtime classification.
//!
//! The target program is wrapped in an instrumented harness, executed in an
//! isolated backend (container or guarded subprocess), and its first
//! uncaught exception is mapped to a pattern hypothesis.

pub mod analyzer;
pub mod harness;
pub mod output;
pub mod sandbox;

pub use analyzer::DynamicAnalyzer;
pub use sandbox::{ExecutionResult, SandboxExecutor};
