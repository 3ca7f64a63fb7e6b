//! Settings for the career agent, read from the process environment.

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::core::errors::{ConfigError, ConfigResult};

/// Placeholder credential shipped in sample `.env` files.
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const MODEL_ENV: &str = "OPENAI_MODEL_NAME";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
const TEMPERATURE_ENV: &str = "CAREER_AGENT_TEMPERATURE";
const TIMEOUT_ENV: &str = "CAREER_AGENT_LLM_TIMEOUT_SECS";
const PIPELINE_ENV: &str = "CAREER_AGENT_PIPELINE";
const MOCK_SEED_ENV: &str = "CAREER_AGENT_MOCK_SEED";
const PORT_ENV: &str = "CAREER_AGENT_PORT";

/// Top-level settings.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Agent graph settings.
    pub agent: AgentSettings,
}

impl Settings {
    /// Load settings from the process environment, after reading `.env` if present.
    ///
    /// # Errors
    /// Returns an error if a value is present but invalid.
    pub fn from_env() -> ConfigResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns an error if a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerSettings {
            port: parse_or(&lookup, PORT_ENV, DEFAULT_PORT, "expected a port number")?,
        };

        let agent = AgentSettings {
            api_key: lookup(API_KEY_ENV).map(SecretString::new),
            model: lookup(MODEL_ENV)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()),
            temperature: parse_or(&lookup, TEMPERATURE_ENV, DEFAULT_TEMPERATURE, "expected a number")?,
            timeout: Duration::from_secs(parse_or(
                &lookup,
                TIMEOUT_ENV,
                DEFAULT_TIMEOUT_SECS,
                "expected a number of seconds",
            )?),
            shape: parse_or(&lookup, PIPELINE_ENV, PipelineShape::default(), "expected single or two_stage")?,
            mock_seed: lookup(MOCK_SEED_ENV)
                .map(|raw| parse_value(MOCK_SEED_ENV, &raw, "expected an unsigned integer"))
                .transpose()?,
        };

        let settings = Self { server, agent };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.agent.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: TIMEOUT_ENV,
                value: "0".to_string(),
                reason: "timeout must be > 0",
            });
        }

        if !(0.0..=2.0).contains(&self.agent.temperature) {
            return Err(ConfigError::InvalidValue {
                key: TEMPERATURE_ENV,
                value: self.agent.temperature.to_string(),
                reason: "temperature must be within 0.0..=2.0",
            });
        }

        if let Some(base_url) = &self.agent.base_url {
            Url::parse(base_url)?;
        }

        Ok(())
    }
}

/// HTTP server settings.
#[derive(Clone, Debug)]
pub struct ServerSettings {
    /// Listen port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

/// Shape of the live agent graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineShape {
    /// One counselor node answering directly.
    #[default]
    SingleStage,
    /// Counselor advice followed by a response generation node.
    TwoStage,
}

impl FromStr for PipelineShape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "single" | "single_stage" => Ok(Self::SingleStage),
            "two_stage" => Ok(Self::TwoStage),
            other => Err(other.to_string()),
        }
    }
}

/// Agent graph and completion provider settings.
#[derive(Clone, Debug)]
pub struct AgentSettings {
    /// Provider credential; absent or placeholder selects the mock graph.
    pub api_key: Option<SecretString>,
    /// Completion model name.
    pub model: String,
    /// Optional provider base URL.
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Upper bound on a single completion call.
    pub timeout: Duration,
    /// Live graph shape.
    pub shape: PipelineShape,
    /// Fixed seed for mock reply selection.
    pub mock_seed: Option<u64>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            shape: PipelineShape::default(),
            mock_seed: None,
        }
    }
}

impl AgentSettings {
    /// Return the credential when it is usable for live generation.
    #[must_use]
    pub fn live_api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T, reason: &'static str) -> ConfigResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => parse_value(key, &raw, reason),
        _ => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str, reason: &'static str) -> ConfigResult<T> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason,
    })
}
