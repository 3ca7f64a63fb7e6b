//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::agent::{Pipeline, build_pipeline};
use crate::conversation::{ConversationStore, InMemoryConversationStore, Orchestrator};
use crate::core::config::Settings;

/// Shared application state.
pub struct AppState {
    /// Chat orchestration over the store and the pipeline.
    pub orchestrator: Orchestrator,
    /// Model name reported by the health endpoint.
    pub model_name: String,
}

impl AppState {
    /// Build the state from settings: an empty store and the pipeline chosen for this process.
    #[must_use]
    pub fn new(settings: &Settings) -> Arc<Self> {
        let store = Arc::new(InMemoryConversationStore::new());
        let pipeline = build_pipeline(&settings.agent);
        Self::with_components(store, pipeline, settings.agent.model.clone())
    }

    /// Build the state from explicit components.
    #[must_use]
    pub fn with_components(
        store: Arc<dyn ConversationStore>,
        pipeline: Arc<dyn Pipeline>,
        model_name: String,
    ) -> Arc<Self> {
        Arc::new(Self {
            orchestrator: Orchestrator::new(store, pipeline),
            model_name,
        })
    }
}
