//! Identifiers, settings, and error types shared across the crate.

pub mod config;
pub mod errors;
pub mod ids;

pub use config::{AgentSettings, PipelineShape, ServerSettings, Settings};
pub use errors::{ConfigError, ConfigResult, GenerationError, GenerationResult};
pub use ids::{ConversationId, MessageId};
