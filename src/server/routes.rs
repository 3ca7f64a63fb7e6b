//! HTTP route handlers for the career agent API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::agent::Context;
use crate::conversation::{ChatMessage, Conversation};
use crate::core::ids::ConversationId;

use super::state::AppState;

/// Prefix of the versioned API.
pub const API_V1_PREFIX: &str = "/api/v1";

/// Error body returned with non-success statuses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Human readable description.
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorDetail>);

fn not_found(id: ConversationId) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDetail {
            detail: format!("conversation {id} not found"),
        }),
    )
}

/// Create the API router with all routes.
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest(API_V1_PREFIX, api_router())
        .with_state(state)
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .route("/send", post(chat))
        .route(
            "/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route("/conversations/{conversation_id}", get(get_conversation))
        .route(
            "/conversations/{conversation_id}/messages",
            get(get_conversation_messages),
        )
}

/// Welcome endpoint.
async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": format!("Welcome to the career agent API. Endpoints live under {API_V1_PREFIX}")
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "career-agent",
        "version": env!("CARGO_PKG_VERSION"),
        "pipeline": state.orchestrator.pipeline_mode().as_str(),
        "model": state.model_name,
        "conversations": state.orchestrator.conversation_count(),
    }))
}

/// Chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Conversation to continue; a new one is created when absent.
    pub conversation_id: Option<ConversationId>,
    /// Free-form context, e.g. `selected_role`.
    pub metadata: Option<Context>,
}

/// Chat response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub message: String,
    /// Conversation the reply belongs to.
    pub conversation_id: ConversationId,
    /// Full history after this request.
    pub messages: Vec<ChatMessage>,
    /// Context passed to the agent graph.
    pub metadata: Option<Context>,
}

/// Handle chat requests.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let outcome = state
        .orchestrator
        .handle_request(&request.message, request.conversation_id, request.metadata)
        .await;

    if let Some(error) = &outcome.error {
        tracing::debug!("Chat request for {} ended with: {error}", outcome.conversation_id);
    }

    let messages = state
        .orchestrator
        .conversation(outcome.conversation_id)
        .map(|c| c.messages)
        .unwrap_or_default();

    Json(ChatResponse {
        message: outcome.message,
        conversation_id: outcome.conversation_id,
        messages,
        metadata: outcome.metadata,
    })
}

/// Create an empty conversation.
async fn create_conversation(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<Conversation>) {
    (
        StatusCode::CREATED,
        Json(state.orchestrator.create_conversation()),
    )
}

/// List conversation identifiers.
async fn list_conversations(State(state): State<Arc<AppState>>) -> Json<Vec<ConversationId>> {
    Json(state.orchestrator.conversation_ids())
}

/// Fetch one conversation.
async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<Conversation>, ApiError> {
    state
        .orchestrator
        .conversation(conversation_id)
        .map(Json)
        .ok_or_else(|| not_found(conversation_id))
}

/// Fetch the messages of one conversation.
async fn get_conversation_messages(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    state
        .orchestrator
        .conversation(conversation_id)
        .map(|c| Json(c.messages))
        .ok_or_else(|| not_found(conversation_id))
}
