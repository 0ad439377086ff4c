//! Shared application state.

use std::sync::{Arc, Mutex};

use mirage_core::MirageConfig;
use mirage_dynamic::DynamicAnalyzer;
use mirage_linguistic::{LinguisticAnalyzer, LlmReasoner};
use mirage_storage::AnalysisStore;
use rustc_hash::FxHashSet;

/// State shared by the request handlers and the background tasks.
///
/// The in-progress id set is the only intra-process shared mutable state:
/// the request handler inserts, the background task removes. Its lifetime
/// is that of the background task; losing it on restart surfaces as a
/// stale `processing` status, which callers resolve via polling timeout.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AnalysisStore>,
    pub dynamic: Arc<DynamicAnalyzer>,
    pub linguistic: Arc<LinguisticAnalyzer>,
    pub config: Arc<MirageConfig>,
    pub in_progress: Arc<Mutex<FxHashSet<i64>>>,
}

impl AppState {
    pub fn new(config: MirageConfig, store: AnalysisStore) -> Self {
        let reasoner = LlmReasoner::from_config(
            &config.providers,
            config.analysis.provider_timeout(),
        );
        Self {
            store: Arc::new(store),
            dynamic: Arc::new(DynamicAnalyzer::new(config.sandbox.clone())),
            linguistic: Arc::new(LinguisticAnalyzer::new(reasoner)),
            config: Arc::new(config),
            in_progress: Arc::new(Mutex::new(FxHashSet::default())),
        }
    }

    pub fn mark_in_progress(&self, id: i64) {
        self.in_progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id);
    }

    pub fn clear_in_progress(&self, id: i64) {
        self.in_progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&id);
    }

    /// Analyses whose linguistic stage is still running.
    pub fn in_flight(&self) -> usize {
        self.in_progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
