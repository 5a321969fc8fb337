//! Interactive console for the architecture assistant.
//!
//! Reads one message per line from stdin and prints the assistant's reply.
//! Type `exit` to quit.

use std::env;
use std::sync::Arc;

use clap::Parser;
use database::Database;
use groq_oracle::GroqOracle;
use oracle_core::{TextOracle, UnconfiguredOracle};
use orchestrator::{AssistantRequest, Orchestrator, OrchestratorConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATABASE_URL: &str = "sqlite:archassistant.db?mode=rwc";

#[derive(Debug, Parser)]
#[command(name = "archassistant-console")]
#[command(about = "Chat with the architecture assistant from the terminal")]
struct Args {
    /// User id the conversation belongs to
    #[arg(long)]
    user: String,

    /// SQLite database URL. Falls back to SQLITE_PATH env.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so replies stay readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let database_url = args
        .database_url
        .or_else(|| env::var("SQLITE_PATH").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    let oracle: Arc<dyn TextOracle> = match GroqOracle::from_env() {
        Ok(oracle) => Arc::new(oracle),
        Err(e) => {
            warn!(error = %e, "Groq oracle not configured");
            Arc::new(UnconfiguredOracle::new(e.to_string()))
        }
    };
    let orchestrator = Orchestrator::new(&OrchestratorConfig::from_env()?, db, oracle)?;
    info!(user_id = %args.user, "Console session started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut conversation_id: Option<String> = None;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") {
            break;
        }

        let mut request = AssistantRequest::new(args.user.as_str(), message);
        request.conversation_id = conversation_id.clone();

        let text = match orchestrator.process_message(request).await {
            Ok(reply) => {
                conversation_id = Some(reply.conversation_id);
                reply.reply
            }
            Err(e) => {
                warn!(error = %e, "Message failed");
                e.user_message()
            }
        };
        stdout.write_all(format!("{}\n\n", text).as_bytes()).await?;
    }

    Ok(())
}
