//! Multi-turn conversation with rolling summarization.
//!
//! `/extract` runs the information extractor over the conversation so far,
//! using the same provider as the chat.

use std::io::Write;
use std::sync::Arc;

use colloquy_config::Config;
use colloquy_conversation::ConversationManager;
use colloquy_core::CompletionService;
use colloquy_extraction::InformationExtractor;
use tracing::info;

use super::build_provider;
use super::extract::print_result;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional summarization threshold override
    pub threshold: Option<usize>,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let provider = Arc::new(build_provider(&config)?);

        let mut conversation_config = config.conversation_config();
        if let Some(threshold) = input.threshold {
            conversation_config = conversation_config.with_summarization_threshold(threshold);
        }

        let mut manager = ConversationManager::new(Arc::clone(&provider), conversation_config);
        info!(
            "Starting conversation {} (summarization threshold: {})",
            manager.history().id(),
            manager.config().summarization_threshold
        );

        if let Some(msg) = input.message {
            let response = manager.process_turn(&msg).await?;
            println!("{response}");
            return Ok(());
        }

        let extractor = InformationExtractor::new(provider, config.extraction_config());
        run_interactive(&mut manager, &extractor).await
    }
}

async fn run_interactive<P: CompletionService>(
    manager: &mut ConversationManager<P>,
    extractor: &InformationExtractor<P>,
) -> anyhow::Result<()> {
    println!("=== Conversation: {} ===", manager.history().id());
    println!("Commands: /summary, /history, /stats, /extract, exit\n");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "exit" | "quit" | "q" => break,
            "/summary" => {
                match manager.summary() {
                    Some(summary) => println!("\n{summary}\n"),
                    None => println!("\n(no summary yet)\n"),
                }
                continue;
            }
            "/history" => {
                println!();
                for message in manager.get_conversation_history() {
                    println!("{}: {}", message.role(), message.content());
                }
                println!();
                continue;
            }
            "/stats" => {
                print_stats(manager);
                continue;
            }
            "/extract" => {
                extract_from_conversation(manager, extractor).await;
                continue;
            }
            _ => {}
        }

        match manager.process_turn(input).await {
            Ok(response) => println!("\n{response}\n"),
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        }

        match manager.maybe_summarize().await {
            Ok(Some(_)) => println!(
                "[conversation summarized after {} turns]\n",
                manager.total_turns()
            ),
            Ok(None) => {}
            Err(e) => eprintln!("Summarization failed, history kept as is: {e}"),
        }
    }

    println!(
        "\nConversation ended. Total turns: {}",
        manager.total_turns()
    );
    Ok(())
}

/// Extract contact details from every message still in the history,
/// including the summary.
async fn extract_from_conversation<P: CompletionService>(
    manager: &ConversationManager<P>,
    extractor: &InformationExtractor<P>,
) {
    let text = manager.conversation_text();
    if text.trim().is_empty() {
        println!("\n(nothing to extract yet)\n");
        return;
    }

    println!();
    match extractor.extract_information(&text).await {
        Ok(result) => print_result(&result),
        Err(e) => eprintln!("Extraction failed: {e}"),
    }
    println!();
}

fn print_stats<P: CompletionService>(manager: &ConversationManager<P>) {
    let history = manager.history();
    let stats = history.stats();
    println!();
    println!("Messages: {}", stats.total_messages);
    println!(
        "  user: {}, assistant: {}, system: {}",
        stats.user_messages, stats.assistant_messages, stats.system_messages
    );
    println!("Total turns: {}", stats.total_turns);
    println!(
        "Characters: {} (~{} tokens)",
        stats.total_characters, stats.estimated_tokens
    );
    println!("Has summary: {}", stats.has_summary);
    println!(
        "Summarize now: {}",
        if manager.should_summarize() { "yes" } else { "no" }
    );
    println!(
        "Started: {}, last change: {}",
        history.created_at().format("%Y-%m-%d %H:%M:%S UTC"),
        history.updated_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
}
