//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use colloquy_config::Config;
use colloquy_providers::GroqProvider;
use tracing::info;

mod chat;
mod doctor;
mod extract;
mod init;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use doctor::DoctorStrategy;
pub use extract::{ExtractInput, ExtractStrategy};
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Build the Groq provider described by the `provider` config section.
fn build_provider(config: &Config) -> anyhow::Result<GroqProvider> {
    let section = &config.provider;
    info!("Using model {} at {}", section.model, section.base_url);

    let provider = GroqProvider::new(section.api_key.clone())?
        .with_base_url(section.base_url.clone())
        .with_model(section.model.clone())
        .with_temperature(section.temperature)
        .with_max_tokens(section.max_tokens)
        .with_retry_policy(section.retry_policy())
        .with_timeout(section.timeout())?;

    Ok(provider)
}

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// parameters are passed without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
