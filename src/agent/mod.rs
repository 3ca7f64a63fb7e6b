//! Agent graph producing counselor replies.
//!
//! - `state`: messages, context, and routing marker for one run
//! - `graph`: the `Pipeline` seam and the node runner
//! - `nodes`: live counselor stages and the canned reply node
//! - `completer`: text completion over Rig's OpenAI provider
//! - `mock`: canned reply catalog
//! - `prompts`: system instructions

pub mod completer;
pub mod graph;
pub mod mock;
pub mod nodes;
pub mod prompts;
pub mod state;

use std::sync::Arc;

use tracing::{info, warn};

pub use completer::{CompletionFuture, RigCompleter, TextCompleter, openai_completer};
pub use graph::{AgentGraph, LiveOptions, Node, Pipeline, PipelineFuture, PipelineMode};
pub use mock::{MOCK_RESPONSES, MockResponder};
pub use state::{Context, CounselorRole, MessageKind, NodeId, PipelineMessage, PipelineOutput, PipelineState};

use crate::core::config::AgentSettings;

/// Select the graph for this process.
///
/// A usable credential builds the live graph. A missing or placeholder
/// credential, or a client that fails to build, falls back to canned replies.
#[must_use]
pub fn build_pipeline(settings: &AgentSettings) -> Arc<dyn Pipeline> {
    if settings.live_api_key().is_none() {
        warn!("OPENAI_API_KEY is not set or is a placeholder; using mock responses");
        return Arc::new(AgentGraph::mock(mock_responder(settings)));
    }

    match openai_completer(settings) {
        Ok(completer) => {
            info!(
                "Using live agent graph (model {}, {:?})",
                settings.model, settings.shape
            );
            Arc::new(AgentGraph::live(
                completer,
                LiveOptions {
                    shape: settings.shape,
                    timeout: settings.timeout,
                },
            ))
        }
        Err(err) => {
            warn!("Failed to build completion client: {err}; using mock responses");
            Arc::new(AgentGraph::mock(mock_responder(settings)))
        }
    }
}

fn mock_responder(settings: &AgentSettings) -> MockResponder {
    settings
        .mock_seed
        .map_or_else(MockResponder::new, MockResponder::with_seed)
}
