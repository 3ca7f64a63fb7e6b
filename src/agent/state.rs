//! State flowing through the agent graph.

use serde_json::Value;

use crate::core::errors::GenerationError;

/// Free-form context mapping passed along with the messages.
pub type Context = serde_json::Map<String, Value>;

/// Context key selecting the counselor framing.
pub const SELECTED_ROLE_KEY: &str = "selected_role";

/// Kind of a pipeline message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageKind {
    /// Text written by the user.
    Human,
    /// Text produced by the agent.
    Ai,
}

/// A message inside the agent graph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineMessage {
    /// Message kind.
    pub kind: MessageKind,
    /// Message text.
    pub content: String,
}

impl PipelineMessage {
    /// Human message.
    #[must_use]
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Human,
            content: content.into(),
        }
    }

    /// AI message.
    #[must_use]
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Ai,
            content: content.into(),
        }
    }
}

/// Graph node identifiers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NodeId {
    /// Live counselor node.
    CareerCounselor,
    /// Live final answer node of the two-stage graph.
    ResponseGeneration,
    /// Canned reply node.
    MockAgent,
}

impl NodeId {
    /// Stable node name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CareerCounselor => "career_counselor",
            Self::ResponseGeneration => "response_generation",
            Self::MockAgent => "agent",
        }
    }
}

/// Framing used by the counselor node.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CounselorRole {
    /// General career counseling.
    #[default]
    CareerCounselor,
    /// IT career specialist.
    ItSpecialist,
}

impl CounselorRole {
    /// Read the role from the `selected_role` context key.
    #[must_use]
    pub fn from_context(context: &Context) -> Self {
        match context.get(SELECTED_ROLE_KEY).and_then(Value::as_str) {
            Some("it_specialist") => Self::ItSpecialist,
            _ => Self::CareerCounselor,
        }
    }
}

/// Per-invocation graph state.
#[derive(Clone, Debug)]
pub struct PipelineState {
    /// Messages seen and produced so far.
    pub messages: Vec<PipelineMessage>,
    /// Context mapping.
    pub context: Context,
    /// Whether the IT specialist framing was consulted.
    pub it_consultation: bool,
    /// Intermediate advice handed from the counselor to response generation.
    pub advice: Option<String>,
    /// Next node to run; `None` once terminal.
    pub next: Option<NodeId>,
}

impl PipelineState {
    /// Create a state positioned at `entry`.
    #[must_use]
    pub const fn new(messages: Vec<PipelineMessage>, context: Context, entry: NodeId) -> Self {
        Self {
            messages,
            context,
            it_consultation: false,
            advice: None,
            next: Some(entry),
        }
    }

    /// Most recent human message, or an empty string.
    #[must_use]
    pub fn last_user_message(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.kind == MessageKind::Human)
            .map_or("", |m| m.content.as_str())
    }

    /// Append an AI reply and mark the run terminal.
    pub fn finish_with_reply(&mut self, reply: String) {
        self.messages.push(PipelineMessage::ai(reply));
        self.next = None;
    }
}

/// Uniform result of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Messages after the run; unchanged input on failure.
    pub messages: Vec<PipelineMessage>,
    /// Context after the run.
    pub context: Context,
    /// Set when no reply could be generated.
    pub error: Option<GenerationError>,
}

impl PipelineOutput {
    /// Text of the last AI message, if any.
    #[must_use]
    pub fn reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.kind == MessageKind::Ai)
            .map(|m| m.content.as_str())
    }
}
