use colloquy_config::{API_KEY_ENV, Config};

/// Strategy for initializing the configuration.
///
/// Creates the default configuration file at `~/colloquy/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::create_config()?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Add your Groq API key to the config file, or export {API_KEY_ENV}");
        println!("   2. Run 'colloquy doctor' to check the connection");
        println!("   3. Run 'colloquy chat' to start a conversation");
        println!();
        println!("Configuration options:");
        println!("   - provider.model: Groq model to use (llama-3.1-8b-instant, llama-3.3-70b-versatile, ...)");
        println!("   - conversation.summarization_threshold: user turns between summaries (0 disables)");
        println!("   - conversation.preserve_recent: messages kept verbatim when summarizing");
        println!("   - extraction.confidence_floor: minimum confidence for a valid extraction");
        println!();
        Ok(())
    }
}
