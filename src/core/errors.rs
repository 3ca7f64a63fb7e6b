//! Error types for settings and reply generation.

use std::time::Duration;

use thiserror::Error;

/// Settings error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment value could not be parsed or is out of range.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Environment key.
        key: &'static str,
        /// Raw value received.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
    /// Base URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience result alias for settings.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure of the agent graph to produce a reply.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No usable provider credential is configured.
    #[error("no provider credential configured")]
    MissingCredential,
    /// HTTP client error from Rig while building the provider client.
    #[error("http client error: {0}")]
    HttpClient(#[from] rig::http_client::Error),
    /// Completion error returned by the provider.
    #[error("completion error: {0}")]
    Completion(#[from] rig::completion::CompletionError),
    /// The provider did not answer in time.
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),
    /// The provider answered with no text.
    #[error("completion returned no text")]
    EmptyResponse,
    /// The graph routed to a node it does not contain.
    #[error("unknown graph node: {0}")]
    UnknownNode(&'static str),
    /// The graph did not terminate within its node count.
    #[error("graph did not terminate after {0} steps")]
    StepLimit(usize),
}

impl GenerationError {
    /// Short summary safe to keep next to a user-facing reply.
    #[must_use]
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::MissingCredential | Self::HttpClient(_) | Self::Completion(_) => {
                "generation failed"
            }
            Self::Timeout(_) => "generation timed out",
            Self::EmptyResponse => "empty generation",
            Self::UnknownNode(_) | Self::StepLimit(_) => "invalid agent graph",
        }
    }
}

/// Convenience result alias for generation.
pub type GenerationResult<T> = Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_hides_details() {
        let err = GenerationError::Timeout(Duration::from_secs(3));
        assert_eq!(err.summary(), "generation timed out");
        assert!(err.to_string().contains("3s"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "CAREER_AGENT_PORT",
            value: "abc".to_string(),
            reason: "expected a port number",
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"abc\" for CAREER_AGENT_PORT: expected a port number"
        );
    }
}
