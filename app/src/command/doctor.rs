use colloquy_config::{API_KEY_ENV, Config};
use colloquy_core::{CompletionError, CompletionService, Message};
use colloquy_providers::RetryPolicy;
use tracing::info;

use super::build_provider;

/// Strategy for checking configuration and provider connectivity.
///
/// Prints the config location, the masked API key and the provider
/// settings, then makes one live request without retries.
#[derive(Debug, Clone, Copy)]
pub struct DoctorStrategy;

impl super::CommandStrategy for DoctorStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        println!("=== colloquy diagnostics ===\n");

        let config_path = Config::config_path()?;
        println!("Config:");
        println!("  Path: {}", config_path.display());
        if !config_path.exists() {
            println!("  Status: missing");
            println!("  Hint: run 'colloquy init' to create it");
            return Ok(());
        }

        let config = match Config::load() {
            Ok(config) => {
                println!("  Status: loaded");
                config
            }
            Err(e) => {
                println!("  Status: invalid");
                println!("  Error: {e}");
                return Ok(());
            }
        };
        println!();

        println!("API Key:");
        let key = &config.provider.api_key;
        if key.trim().is_empty() {
            println!("  Status: not configured");
            println!("  Hint: set {API_KEY_ENV} or edit the config file");
            return Ok(());
        }
        println!("  Key: {}", config.provider.masked_api_key());
        println!("  Length: {} characters", key.chars().count());
        println!();

        println!("Provider:");
        println!("  Base URL: {}", config.provider.base_url);
        println!("  Model: {}", config.provider.model);
        println!("  Timeout: {}s", config.provider.timeout_secs);
        println!();

        println!("Connection test:");
        let provider = build_provider(&config)?.with_retry_policy(RetryPolicy::none());
        let request = [Message::user("Hello, this is a test message.")?];

        info!("Sending diagnostic request");
        match provider.complete(&request).await {
            Ok(reply) => {
                println!("  Status: ok");
                println!("  Response length: {} characters", reply.chars().count());
            }
            Err(e) => {
                println!("  Status: failed ({})", e.kind());
                println!("  Error: {e}");
                println!("  Hint: {}", hint(&e));
            }
        }

        Ok(())
    }
}

const fn hint(error: &CompletionError) -> &'static str {
    match error {
        CompletionError::Authentication(_) => "check that the API key is correct and active",
        CompletionError::RateLimit(_) => "wait a moment and try again",
        CompletionError::Transport(_) => "check your internet connection and the API status",
        CompletionError::InvalidRequest(_) => "check the model name and request settings",
    }
}
