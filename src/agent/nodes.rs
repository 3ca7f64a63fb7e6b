//! Graph nodes: the live counselor stages and the canned reply node.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::agent::completer::TextCompleter;
use crate::agent::graph::{Node, PipelineFuture};
use crate::agent::mock::MockResponder;
use crate::agent::prompts::{counselor_instruction, response_generation_instruction};
use crate::agent::state::{CounselorRole, NodeId, PipelineState};
use crate::core::errors::{GenerationError, GenerationResult};

/// Call the completer under a timeout and reject blank output.
async fn generate(
    completer: &dyn TextCompleter,
    timeout: Duration,
    instruction: String,
    user_message: String,
) -> GenerationResult<String> {
    let text = tokio::time::timeout(timeout, completer.complete(instruction, user_message))
        .await
        .map_err(|_| GenerationError::Timeout(timeout))??;

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

/// Counselor stage.
///
/// Without a handoff it answers the user directly. With one, its output is
/// kept as advice for the next node.
pub struct CounselorNode {
    completer: Arc<dyn TextCompleter>,
    timeout: Duration,
    handoff: Option<NodeId>,
}

impl CounselorNode {
    /// Create the node.
    #[must_use]
    pub fn new(completer: Arc<dyn TextCompleter>, timeout: Duration, handoff: Option<NodeId>) -> Self {
        Self {
            completer,
            timeout,
            handoff,
        }
    }
}

impl Node for CounselorNode {
    fn id(&self) -> NodeId {
        NodeId::CareerCounselor
    }

    fn invoke(&self, mut state: PipelineState) -> PipelineFuture<'_, GenerationResult<PipelineState>> {
        Box::pin(async move {
            let role = CounselorRole::from_context(&state.context);
            let user_message = state.last_user_message().to_string();
            let instruction = counselor_instruction(role, &user_message);

            let reply = generate(self.completer.as_ref(), self.timeout, instruction, user_message).await?;

            match self.handoff {
                Some(next) => {
                    debug!("Counselor handing advice to {}", next.as_str());
                    state.it_consultation = role == CounselorRole::ItSpecialist;
                    state.advice = Some(reply);
                    state.next = Some(next);
                }
                None => state.finish_with_reply(reply),
            }
            Ok(state)
        })
    }
}

/// Final stage of the two-stage graph, folding the counselor advice into one answer.
pub struct ResponseGenerationNode {
    completer: Arc<dyn TextCompleter>,
    timeout: Duration,
}

impl ResponseGenerationNode {
    /// Create the node.
    #[must_use]
    pub fn new(completer: Arc<dyn TextCompleter>, timeout: Duration) -> Self {
        Self { completer, timeout }
    }
}

impl Node for ResponseGenerationNode {
    fn id(&self) -> NodeId {
        NodeId::ResponseGeneration
    }

    fn invoke(&self, mut state: PipelineState) -> PipelineFuture<'_, GenerationResult<PipelineState>> {
        Box::pin(async move {
            let user_message = state.last_user_message().to_string();
            let instruction = response_generation_instruction(
                &user_message,
                state.it_consultation,
                state.advice.as_deref().unwrap_or_default(),
            );

            let reply = generate(self.completer.as_ref(), self.timeout, instruction, user_message).await?;
            state.finish_with_reply(reply);
            Ok(state)
        })
    }
}

/// Canned reply node; ignores its input.
pub struct MockNode {
    responder: MockResponder,
}

impl MockNode {
    /// Create the node.
    #[must_use]
    pub const fn new(responder: MockResponder) -> Self {
        Self { responder }
    }
}

impl Node for MockNode {
    fn id(&self) -> NodeId {
        NodeId::MockAgent
    }

    fn invoke(&self, mut state: PipelineState) -> PipelineFuture<'_, GenerationResult<PipelineState>> {
        let reply = self.responder.pick().to_string();
        Box::pin(async move {
            state.finish_with_reply(reply);
            Ok(state)
        })
    }
}
