//! Mirage static layer — Python parsing, the nine structural detectors, the
//! taxonomy classifier, and the explainer.
//!
//! The parser runs once per analysis and produces a flat [`parser::ParseResult`]
//! that every detector (and the linguistic layer's AST verifier) consumes.

pub mod analyzer;
pub mod detectors;
pub mod parser;
pub mod taxonomy;

pub use analyzer::{StaticAnalyzer, StaticReport};
pub use parser::ParseResult;
pub use taxonomy::{classifier, explainer};
