//! Startup helpers for the career agent server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::core::config::Settings;
use crate::server::{self, AppState};

/// Run the server until Ctrl+C.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();
    tracing::info!("Starting career agent v{}", env!("CARGO_PKG_VERSION"));

    let Some(settings) = load_settings() else {
        return ExitCode::from(1);
    };
    let Some(rt) = build_runtime() else {
        return ExitCode::from(1);
    };

    if let Err(e) = rt.block_on(serve(settings)) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    tracing::info!("Career agent stopped");
    ExitCode::SUCCESS
}

fn load_settings() -> Option<Settings> {
    Settings::from_env()
        .map_err(|e| tracing::error!("Invalid configuration: {e}"))
        .ok()
}

fn build_runtime() -> Option<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| tracing::error!("Failed to create runtime: {e}"))
        .ok()
}

async fn serve(settings: Settings) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = initialize(&settings);
    server::run_server_with_shutdown(state, settings.server.port, shutdown_signal()).await
}

/// Initialize application state without starting the server.
#[must_use]
pub fn initialize(settings: &Settings) -> Arc<AppState> {
    let state = AppState::new(settings);
    tracing::info!(
        "Agent pipeline: {} (model {})",
        state.orchestrator.pipeline_mode(),
        state.model_name
    );
    state
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::PipelineMode;

    #[test]
    fn test_initialize_without_credential_serves_mock_replies() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        let state = initialize(&settings);
        assert_eq!(state.orchestrator.pipeline_mode(), PipelineMode::Mock);
        assert_eq!(state.model_name, "gpt-4o");
        assert_eq!(state.orchestrator.conversation_count(), 0);
    }
}
