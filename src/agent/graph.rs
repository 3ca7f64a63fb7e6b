//! Agent graph: a small set of nodes run in sequence until one marks the state terminal.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::agent::completer::TextCompleter;
use crate::agent::mock::MockResponder;
use crate::agent::nodes::{CounselorNode, MockNode, ResponseGenerationNode};
use crate::agent::state::{Context, NodeId, PipelineMessage, PipelineOutput, PipelineState};
use crate::core::config::PipelineShape;
use crate::core::errors::{GenerationError, GenerationResult};

/// Boxed future type for graph and node execution.
pub type PipelineFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which kind of graph is serving replies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PipelineMode {
    /// Hosted language model.
    Live,
    /// Canned replies.
    Mock,
}

impl PipelineMode {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reply generation as seen by the orchestrator.
pub trait Pipeline: Send + Sync {
    /// Live or mock.
    fn mode(&self) -> PipelineMode;

    /// Run once over `messages` and `context`.
    ///
    /// Failures are reported in [`PipelineOutput::error`], never as a panic.
    fn run(&self, messages: Vec<PipelineMessage>, context: Context) -> PipelineFuture<'_, PipelineOutput>;
}

/// One processing stage of the graph.
pub trait Node: Send + Sync {
    /// Node identifier used for routing.
    fn id(&self) -> NodeId;

    /// Transform the state and set `next` (or clear it to terminate).
    ///
    /// # Errors
    /// Returns an error if the node cannot produce its output.
    fn invoke(&self, state: PipelineState) -> PipelineFuture<'_, GenerationResult<PipelineState>>;
}

/// Options for the live graph.
#[derive(Clone, Copy, Debug)]
pub struct LiveOptions {
    /// One or two stages.
    pub shape: PipelineShape,
    /// Upper bound on each completion call.
    pub timeout: Duration,
}

/// Directed graph of nodes with a fixed entry point.
pub struct AgentGraph {
    mode: PipelineMode,
    entry: NodeId,
    nodes: Vec<Arc<dyn Node>>,
}

impl AgentGraph {
    /// Assemble a graph from its nodes.
    #[must_use]
    pub fn new(mode: PipelineMode, entry: NodeId, nodes: Vec<Arc<dyn Node>>) -> Self {
        Self { mode, entry, nodes }
    }

    /// Single node graph answering with canned replies.
    #[must_use]
    pub fn mock(responder: MockResponder) -> Self {
        let nodes: Vec<Arc<dyn Node>> = vec![Arc::new(MockNode::new(responder))];
        Self::new(PipelineMode::Mock, NodeId::MockAgent, nodes)
    }

    /// Graph calling the completion provider.
    #[must_use]
    pub fn live(completer: Arc<dyn TextCompleter>, options: LiveOptions) -> Self {
        let nodes: Vec<Arc<dyn Node>> = match options.shape {
            PipelineShape::SingleStage => vec![Arc::new(CounselorNode::new(
                Arc::clone(&completer),
                options.timeout,
                None,
            ))],
            PipelineShape::TwoStage => vec![
                Arc::new(CounselorNode::new(
                    Arc::clone(&completer),
                    options.timeout,
                    Some(NodeId::ResponseGeneration),
                )),
                Arc::new(ResponseGenerationNode::new(completer, options.timeout)),
            ],
        };
        Self::new(PipelineMode::Live, NodeId::CareerCounselor, nodes)
    }

    fn node(&self, id: NodeId) -> Option<&Arc<dyn Node>> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    async fn execute(&self, mut state: PipelineState) -> GenerationResult<PipelineState> {
        let mut steps = 0_usize;
        while let Some(id) = state.next {
            if steps >= self.nodes.len() {
                return Err(GenerationError::StepLimit(steps));
            }
            let node = self
                .node(id)
                .ok_or(GenerationError::UnknownNode(id.as_str()))?;
            debug!("Running graph node {}", id.as_str());
            state = node.invoke(state).await?;
            steps += 1;
        }
        Ok(state)
    }
}

impl Pipeline for AgentGraph {
    fn mode(&self) -> PipelineMode {
        self.mode
    }

    fn run(&self, messages: Vec<PipelineMessage>, context: Context) -> PipelineFuture<'_, PipelineOutput> {
        Box::pin(async move {
            let state = PipelineState::new(messages.clone(), context.clone(), self.entry);
            match self.execute(state).await {
                Ok(state) => PipelineOutput {
                    messages: state.messages,
                    context: state.context,
                    error: None,
                },
                Err(err) => {
                    warn!("Agent graph failed: {err}");
                    PipelineOutput {
                        messages,
                        context,
                        error: Some(err),
                    }
                }
            }
        })
    }
}
