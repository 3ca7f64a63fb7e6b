//! Conversation orchestration: validation, history, reply generation, persistence.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::agent::{Context, Pipeline, PipelineMessage, PipelineMode};
use crate::conversation::store::ConversationStore;
use crate::conversation::types::{ChatRole, Conversation};
use crate::core::ids::ConversationId;

/// Number of most recent messages handed to the pipeline as history.
pub const CONTEXT_WINDOW: usize = 5;

/// Context key carrying the recent history.
pub const HISTORY_KEY: &str = "history";

/// Default value some clients send for an untouched message field.
pub const PLACEHOLDER_MESSAGE: &str = "string";

/// Reply to an empty or placeholder message.
pub const INVALID_MESSAGE_REPLY: &str = "有効なメッセージを入力してください。";

/// Reply when no answer could be generated.
pub const APOLOGY_REPLY: &str = "申し訳ありません。応答を生成できませんでした。";

/// Result of one chat request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChatOutcome {
    /// Text shown to the user.
    pub message: String,
    /// Conversation the request belongs to.
    pub conversation_id: ConversationId,
    /// Context as seen by the pipeline, or the caller's metadata on rejection.
    pub metadata: Option<Context>,
    /// Short error summary; never sent to clients.
    pub error: Option<String>,
}

/// Coordinates the store and the pipeline for each chat request.
pub struct Orchestrator {
    store: Arc<dyn ConversationStore>,
    pipeline: Arc<dyn Pipeline>,
}

impl Orchestrator {
    /// Create an orchestrator over explicit components.
    #[must_use]
    pub fn new(store: Arc<dyn ConversationStore>, pipeline: Arc<dyn Pipeline>) -> Self {
        Self { store, pipeline }
    }

    /// Handle one user message.
    ///
    /// Invalid input is answered without touching the store or the pipeline.
    /// Generation failures become [`APOLOGY_REPLY`] and append no assistant turn.
    pub async fn handle_request(
        &self,
        text: &str,
        conversation_id: Option<ConversationId>,
        metadata: Option<Context>,
    ) -> ChatOutcome {
        if is_invalid_message(text) {
            debug!("Rejected empty or placeholder message");
            return ChatOutcome {
                message: INVALID_MESSAGE_REPLY.to_string(),
                conversation_id: conversation_id.unwrap_or_default(),
                metadata,
                error: Some("invalid message content".to_string()),
            };
        }

        let conversation_id = self.resolve(conversation_id);
        self.store.append(conversation_id, ChatRole::User, text);

        let mut context = metadata.unwrap_or_default();
        context.insert(HISTORY_KEY.to_string(), self.history(conversation_id));

        let output = self
            .pipeline
            .run(vec![PipelineMessage::human(text)], context)
            .await;

        let reply = match (&output.error, output.reply()) {
            (None, Some(reply)) => Ok(reply.to_string()),
            (Some(err), _) => Err(err.summary().to_string()),
            (None, None) => Err("no reply produced".to_string()),
        };

        match reply {
            Ok(reply) => {
                self.store
                    .append(conversation_id, ChatRole::Assistant, &reply);
                ChatOutcome {
                    message: reply,
                    conversation_id,
                    metadata: Some(output.context),
                    error: None,
                }
            }
            Err(summary) => {
                warn!("Reply generation failed for conversation {conversation_id}: {summary}");
                ChatOutcome {
                    message: APOLOGY_REPLY.to_string(),
                    conversation_id,
                    metadata: Some(output.context),
                    error: Some(summary),
                }
            }
        }
    }

    /// Snapshot of a conversation.
    #[must_use]
    pub fn conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.store.get(id)
    }

    /// Create an empty conversation.
    #[must_use]
    pub fn create_conversation(&self) -> Conversation {
        self.store.create()
    }

    /// All known conversation identifiers.
    #[must_use]
    pub fn conversation_ids(&self) -> Vec<ConversationId> {
        self.store.list_ids()
    }

    /// Number of stored conversations.
    #[must_use]
    pub fn conversation_count(&self) -> usize {
        self.store.len()
    }

    /// Mode of the pipeline serving replies.
    #[must_use]
    pub fn pipeline_mode(&self) -> PipelineMode {
        self.pipeline.mode()
    }

    fn resolve(&self, conversation_id: Option<ConversationId>) -> ConversationId {
        match conversation_id {
            None => self.store.create().id,
            Some(id) => {
                if self.store.get(id).is_none() {
                    info!("Conversation {id} is unknown; it will be created under that id");
                }
                id
            }
        }
    }

    fn history(&self, conversation_id: ConversationId) -> Value {
        let turns: Vec<Value> = self
            .store
            .recent_messages(conversation_id, CONTEXT_WINDOW)
            .into_iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();
        Value::Array(turns)
    }
}

fn is_invalid_message(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text == PLACEHOLDER_MESSAGE
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::agent::{
        AgentGraph, CompletionFuture, LiveOptions, MOCK_RESPONSES, MockResponder, PipelineFuture,
        PipelineOutput, TextCompleter,
    };
    use crate::conversation::store::InMemoryConversationStore;
    use crate::core::config::PipelineShape;
    use crate::core::errors::{GenerationError, GenerationResult};

    /// Pipeline that records each context and answers with a fixed reply.
    struct RecordingPipeline {
        calls: AtomicUsize,
        contexts: Mutex<Vec<Context>>,
        fail: bool,
    }

    impl RecordingPipeline {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                contexts: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    impl Pipeline for RecordingPipeline {
        fn mode(&self) -> PipelineMode {
            PipelineMode::Live
        }

        fn run(
            &self,
            mut messages: Vec<PipelineMessage>,
            context: Context,
        ) -> PipelineFuture<'_, PipelineOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.contexts.lock().unwrap().push(context.clone());
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    return PipelineOutput {
                        messages,
                        context,
                        error: Some(GenerationError::EmptyResponse),
                    };
                }
                messages.push(PipelineMessage::ai("recorded reply"));
                PipelineOutput {
                    messages,
                    context,
                    error: None,
                }
            })
        }
    }

    fn mock_orchestrator() -> (Orchestrator, Arc<InMemoryConversationStore>) {
        let store = Arc::new(InMemoryConversationStore::new());
        let pipeline = Arc::new(AgentGraph::mock(MockResponder::with_seed(11)));
        (Orchestrator::new(store.clone(), pipeline), store)
    }

    #[tokio::test]
    async fn test_new_conversation_gets_reply() {
        let (orchestrator, store) = mock_orchestrator();

        let outcome = orchestrator
            .handle_request("I want career advice", None, None)
            .await;

        assert!(outcome.error.is_none());
        assert!(!outcome.message.is_empty());
        assert!(MOCK_RESPONSES.contains(&outcome.message.as_str()));

        let conversation = store.get(outcome.conversation_id).unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].role, ChatRole::User);
        assert_eq!(conversation.messages[1].role, ChatRole::Assistant);
        assert_eq!(conversation.messages[1].content, outcome.message);
    }

    #[tokio::test]
    async fn test_follow_up_reuses_conversation() {
        let (orchestrator, _store) = mock_orchestrator();

        let first = orchestrator
            .handle_request("I want career advice", None, None)
            .await;
        let second = orchestrator
            .handle_request("Tell me more", Some(first.conversation_id), None)
            .await;

        assert_eq!(second.conversation_id, first.conversation_id);
        let conversation = orchestrator.conversation(first.conversation_id).unwrap();
        assert_eq!(conversation.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_n_requests_store_two_n_messages_in_order() {
        let (orchestrator, _store) = mock_orchestrator();
        let id = orchestrator.create_conversation().id;

        for i in 0..6 {
            orchestrator
                .handle_request(&format!("question {i}"), Some(id), None)
                .await;
        }

        let conversation = orchestrator.conversation(id).unwrap();
        assert_eq!(conversation.messages.len(), 12);
        for (i, pair) in conversation.messages.chunks(2).enumerate() {
            assert_eq!(pair[0].role, ChatRole::User);
            assert_eq!(pair[0].content, format!("question {i}"));
            assert_eq!(pair[1].role, ChatRole::Assistant);
        }
        assert!(
            conversation
                .messages
                .windows(2)
                .all(|w| w[0].timestamp <= w[1].timestamp)
        );
    }

    #[tokio::test]
    async fn test_invalid_messages_have_no_side_effects() {
        let store = Arc::new(InMemoryConversationStore::new());
        let pipeline = RecordingPipeline::new(false);
        let orchestrator = Orchestrator::new(store.clone(), pipeline.clone());
        let id = store.create().id;

        for text in ["", "   ", PLACEHOLDER_MESSAGE, "string ", " string\n"] {
            let outcome = orchestrator.handle_request(text, Some(id), None).await;
            assert_eq!(outcome.message, INVALID_MESSAGE_REPLY);
            assert_eq!(outcome.conversation_id, id);
        }

        let outcome = orchestrator.handle_request("", None, None).await;
        assert_eq!(outcome.message, INVALID_MESSAGE_REPLY);

        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 0);
        assert!(store.get(id).unwrap().messages.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_bounded_to_window() {
        let store = Arc::new(InMemoryConversationStore::new());
        let pipeline = RecordingPipeline::new(false);
        let orchestrator = Orchestrator::new(store.clone(), pipeline.clone());

        let id = store.create().id;
        for i in 0..20 {
            store.append(id, ChatRole::User, &format!("user {i}"));
            store.append(id, ChatRole::Assistant, &format!("assistant {i}"));
        }

        orchestrator.handle_request("latest", Some(id), None).await;

        let contexts = pipeline.contexts.lock().unwrap();
        let history = contexts[0][HISTORY_KEY].as_array().unwrap();
        assert_eq!(history.len(), CONTEXT_WINDOW);
        assert_eq!(history[4], json!({ "role": "user", "content": "latest" }));
        assert_eq!(history[0], json!({ "role": "user", "content": "user 18" }));
    }

    #[tokio::test]
    async fn test_metadata_is_merged_with_history() {
        let (orchestrator, _store) = mock_orchestrator();

        let mut metadata = Context::new();
        metadata.insert("selected_role".to_string(), json!("it_specialist"));
        let outcome = orchestrator
            .handle_request("Rustエンジニアになりたい", None, Some(metadata))
            .await;

        let metadata = outcome.metadata.unwrap();
        assert_eq!(metadata["selected_role"], "it_specialist");
        assert_eq!(metadata[HISTORY_KEY].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_apologizes_without_assistant_turn() {
        let store = Arc::new(InMemoryConversationStore::new());
        let pipeline = RecordingPipeline::new(true);
        let orchestrator = Orchestrator::new(store.clone(), pipeline);

        let outcome = orchestrator.handle_request("help", None, None).await;

        assert_eq!(outcome.message, APOLOGY_REPLY);
        assert_eq!(outcome.error.as_deref(), Some("empty generation"));
        let conversation = store.get(outcome.conversation_id).unwrap();
        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.messages[0].role, ChatRole::User);
    }

    #[tokio::test]
    async fn test_unknown_id_is_created_under_that_id() {
        let (orchestrator, store) = mock_orchestrator();
        let id = ConversationId::new();

        let outcome = orchestrator.handle_request("hello", Some(id), None).await;

        assert_eq!(outcome.conversation_id, id);
        assert_eq!(store.get(id).unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_id_creates_fresh_conversation() {
        let (orchestrator, store) = mock_orchestrator();
        let existing = store.create().id;

        let outcome = orchestrator.handle_request("hello", None, None).await;

        assert_ne!(outcome.conversation_id, existing);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(outcome.conversation_id).unwrap().messages.len(), 2);
    }

    /// Completer that never answers within the test timeouts.
    struct StalledCompleter;

    impl TextCompleter for StalledCompleter {
        fn complete(
            &self,
            _instruction: String,
            _user_message: String,
        ) -> CompletionFuture<'_, GenerationResult<String>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            })
        }
    }

    #[tokio::test]
    async fn test_live_timeout_apologizes_and_keeps_store_unchanged() {
        for shape in [PipelineShape::SingleStage, PipelineShape::TwoStage] {
            let store = Arc::new(InMemoryConversationStore::new());
            let pipeline = Arc::new(AgentGraph::live(
                Arc::new(StalledCompleter),
                LiveOptions {
                    shape,
                    timeout: Duration::from_millis(20),
                },
            ));
            let orchestrator = Orchestrator::new(store.clone(), pipeline);
            let id = store.create().id;

            let outcome = orchestrator.handle_request("転職の相談です", Some(id), None).await;

            assert_eq!(outcome.message, APOLOGY_REPLY);
            assert_eq!(outcome.conversation_id, id);
            assert_eq!(outcome.error.as_deref(), Some("generation timed out"));
            let conversation = store.get(id).unwrap();
            assert_eq!(conversation.messages.len(), 1);
            assert_eq!(conversation.messages[0].role, ChatRole::User);
            assert_eq!(conversation.messages[0].content, "転職の相談です");
        }
    }
}
