use std::sync::Arc;

use crate::config::Config;
use crate::inference::InferenceBackend;
use crate::matching::evaluator::MatchEvaluator;
use crate::storage::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub evaluator: MatchEvaluator,
    pub config: Config,
}

impl AppState {
    /// Wires the evaluator to the same store the handlers use.
    pub fn new(store: Arc<dyn Store>, inference: Arc<dyn InferenceBackend>, config: Config) -> Self {
        let evaluator = MatchEvaluator::new(store.clone(), inference, config.ollama_model.clone());
        Self {
            store,
            evaluator,
            config,
        }
    }
}
