//! Mirage server — HTTP surface and the two-phase orchestrator.
//!
//! Phase A (synchronous): parse, static layer, dynamic layer, provisional
//! classification, persist with `status = processing`, return. Phase B
//! (background task): the four linguistic detectors, re-classification,
//! the single completion update. Callers poll until `complete`.

pub mod orchestrator;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
