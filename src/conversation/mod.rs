//! Conversations: records, the in-process store, and request orchestration.

pub mod orchestrator;
pub mod store;
pub mod types;

pub use orchestrator::{
    APOLOGY_REPLY, CONTEXT_WINDOW, ChatOutcome, HISTORY_KEY, INVALID_MESSAGE_REPLY,
    Orchestrator, PLACEHOLDER_MESSAGE,
};
pub use store::{ConversationStore, InMemoryConversationStore};
pub use types::{ChatMessage, ChatRole, Conversation};
