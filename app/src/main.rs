#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use command::{
    ChatInput, ChatStrategy, CommandStrategy, DoctorStrategy, ExtractInput, ExtractStrategy,
    InitStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(about = "Conversation summarization and information extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with automatic conversation summarization
    Chat {
        /// Single message to send
        #[arg(short = 'm', long)]
        message: Option<String>,

        /// User turns between summaries (0 disables)
        #[arg(long)]
        threshold: Option<usize>,
    },
    /// Extract contact details from text
    Extract {
        /// Text to extract from (reads stdin when omitted)
        text: Option<String>,
    },
    /// Check configuration and API connectivity
    Doctor,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { message, threshold } => {
            ChatStrategy
                .execute(ChatInput { message, threshold })
                .await
        }
        Commands::Extract { text } => ExtractStrategy.execute(ExtractInput { text }).await,
        Commands::Doctor => DoctorStrategy.execute(()).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
