//! Solace application binary - composition root.
//!
//! 1. Load `.env` and configuration
//! 2. Build the Gemini and Google Speech clients
//! 3. Wire in-memory stores and the chat orchestrator
//! 4. Serve the REST API until Ctrl-C

mod cli;

use std::sync::Arc;

use clap::Parser;

use solace_api::{routes, AppState};
use solace_chat::GeminiClient;
use solace_core::config::{api_key_from_env, SolaceConfig};
use solace_core::error::SolaceError;
use solace_speech::GoogleSpeechClient;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    let args = CliArgs::parse();
    let location = args.resolve_config_path();
    let loaded = cli::load_config(&location);
    let base_level = match loaded {
        Ok((ref config, _)) => config.general.log_level.clone(),
        Err(_) => SolaceConfig::default().general.log_level,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(args.resolve_log_level(&base_level))
            }),
        )
        .init();

    tracing::info!("Starting Solace v{}", env!("CARGO_PKG_VERSION"));
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env loaded"),
    }

    let mut config = match loaded {
        Ok((config, outcome)) => {
            cli::log_config_outcome(&location.path, &outcome);
            config
        }
        Err(e) => {
            tracing::error!(path = %location.path.display(), error = %e, "Cannot load configuration");
            return Err(e.into());
        }
    };
    config.general.host = args.resolve_host(&config.general.host);
    config.general.port = args.resolve_port(config.general.port);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);

    let api_key = match api_key_from_env() {
        Ok(key) => key,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start without a provider API key");
            return Err(e.into());
        }
    };

    let model = GeminiClient::new(api_key.clone(), &config.llm)
        .map_err(|e| SolaceError::Provider(e.to_string()))?;
    tracing::info!(model = %config.llm.model, "Language model client ready");

    let transcriber = GoogleSpeechClient::new(api_key, &config.speech)
        .map_err(|e| SolaceError::Provider(e.to_string()))?;
    tracing::info!(language = %config.speech.language_code, "Speech client ready");

    let state = AppState::in_memory(config.clone(), Arc::new(model), Arc::new(transcriber));

    routes::start_server(&config, state).await?;

    Ok(())
}
