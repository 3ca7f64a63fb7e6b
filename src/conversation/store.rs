//! In-process conversation store.

use dashmap::DashMap;
use tracing::debug;

use crate::conversation::types::{ChatMessage, ChatRole, Conversation};
use crate::core::ids::ConversationId;

/// Storage of conversations keyed by identifier.
///
/// Readers receive snapshots; the only mutation is [`ConversationStore::append`].
pub trait ConversationStore: Send + Sync {
    /// Get a snapshot of a conversation.
    fn get(&self, id: ConversationId) -> Option<Conversation>;

    /// Create and register an empty conversation with a fresh identifier.
    fn create(&self) -> Conversation;

    /// Append a message, creating the conversation under `id` if it is unknown.
    fn append(&self, id: ConversationId, role: ChatRole, content: &str) -> ChatMessage;

    /// All known conversation identifiers, in no particular order.
    fn list_ids(&self) -> Vec<ConversationId>;

    /// The last `n` messages of a conversation, oldest first.
    fn recent_messages(&self, id: ConversationId, n: usize) -> Vec<ChatMessage>;

    /// Number of stored conversations.
    fn len(&self) -> usize;

    /// Whether the store holds no conversation.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory store.
///
/// Each conversation lives in its own map shard entry, so an append holds the
/// entry's write lock and concurrent appends to one conversation never drop
/// messages.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: DashMap<ConversationId, Conversation>,
}

impl InMemoryConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn get(&self, id: ConversationId) -> Option<Conversation> {
        self.conversations.get(&id).map(|entry| entry.value().clone())
    }

    fn create(&self) -> Conversation {
        let conversation = Conversation::with_id(ConversationId::new());
        self.conversations
            .insert(conversation.id, conversation.clone());
        debug!("Created conversation {}", conversation.id);
        conversation
    }

    fn append(&self, id: ConversationId, role: ChatRole, content: &str) -> ChatMessage {
        let mut entry = self.conversations.entry(id).or_insert_with(|| {
            debug!("Creating conversation {id} on first append");
            Conversation::with_id(id)
        });
        // Stamped under the entry lock so insertion order matches timestamp order.
        let mut message = ChatMessage::new(role, content);
        message.timestamp = message.timestamp.max(entry.updated_at);
        entry.push(message.clone());
        message
    }

    fn list_ids(&self) -> Vec<ConversationId> {
        self.conversations.iter().map(|entry| *entry.key()).collect()
    }

    fn recent_messages(&self, id: ConversationId, n: usize) -> Vec<ChatMessage> {
        self.conversations
            .get(&id)
            .map(|entry| entry.recent(n).to_vec())
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.conversations.len()
    }
}
