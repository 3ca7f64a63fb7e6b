//! Text completion capability backed by Rig.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::AssistantContent;
use rig::providers::openai;
use tracing::debug;

use crate::core::config::AgentSettings;
use crate::core::errors::{GenerationError, GenerationResult};

/// Boxed future type for completion calls.
pub type CompletionFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Opaque text completion: instruction plus user message in, generated text out.
pub trait TextCompleter: Send + Sync {
    /// Generate a reply.
    ///
    /// # Errors
    /// Returns an error if the provider call fails.
    fn complete(
        &self,
        instruction: String,
        user_message: String,
    ) -> CompletionFuture<'_, GenerationResult<String>>;
}

/// Completer over any Rig completion model.
#[derive(Clone)]
pub struct RigCompleter<M> {
    model: M,
    temperature: f64,
}

impl<M: CompletionModel> RigCompleter<M> {
    /// Wrap a Rig completion model.
    #[must_use]
    pub const fn new(model: M, temperature: f64) -> Self {
        Self { model, temperature }
    }
}

impl<M: CompletionModel> TextCompleter for RigCompleter<M> {
    fn complete(
        &self,
        instruction: String,
        user_message: String,
    ) -> CompletionFuture<'_, GenerationResult<String>> {
        Box::pin(async move {
            let request = self
                .model
                .completion_request(user_message)
                .preamble(instruction)
                .temperature(self.temperature)
                .build();

            let response = self.model.completion(request).await?;
            Ok(extract_text(&response.choice))
        })
    }
}

/// Build an OpenAI-backed completer from settings.
///
/// # Errors
/// Returns an error if no usable credential is configured or the client cannot be built.
pub fn openai_completer(settings: &AgentSettings) -> GenerationResult<Arc<dyn TextCompleter>> {
    let api_key = settings
        .live_api_key()
        .ok_or(GenerationError::MissingCredential)?;

    let builder = openai::Client::<ReqwestClient>::builder().api_key(api_key.to_string());
    let builder = if let Some(base_url) = &settings.base_url {
        builder.base_url(base_url)
    } else {
        builder
    };
    let client = builder.build().map_err(GenerationError::from)?;
    let model = client.completion_model(settings.model.clone());

    debug!("Built OpenAI completer for model {}", settings.model);
    Ok(Arc::new(RigCompleter::new(model, settings.temperature)))
}

/// Extract text from an assistant response.
fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
