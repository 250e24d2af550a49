//! Command-line surface.
//!
//! Three subcommands: `classify` prints the raw local decision as JSON,
//! `respond` runs one message through the full pipeline, `chat` is a
//! line-oriented REPL over stdin.

use crate::bot::{Bot, SenderContext};
use crate::config::Config;
use crate::executor::LinkExecutor;
use crate::llm::{CompatibleClient, ModelClient};
use crate::nlp::Classifier;
use crate::orchestrator::Orchestrator;
use crate::sessions::SessionStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "valet", version, about = "Offline-first assistant message router")]
pub struct Cli {
    /// Path to a config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a message locally and print the decision as JSON.
    Classify {
        /// The message, given as one or more words.
        message: Vec<String>,
    },
    /// Run one message through the full pipeline and print the reply.
    Respond {
        message: Vec<String>,

        /// Sender identity used for the conversation session.
        #[arg(long, default_value = "cli")]
        sender: String,
    },
    /// Interactive chat loop over stdin.
    Chat {
        #[arg(long, default_value = "cli")]
        sender: String,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_init()?,
    };

    match cli.command {
        Commands::Classify { message } => {
            let profile = Arc::new(config.load_profile()?);
            let classifier = Classifier::new(profile);
            let decision = classifier.classify(&message.join(" "));
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(())
        }
        Commands::Respond { message, sender } => {
            let bot = build_bot(&config)?;
            let ctx = SenderContext::new(sender.clone(), sender);
            if let Some(reply) = bot.handle(&message.join(" "), &ctx).await {
                println!("{}", reply.text);
            }
            Ok(())
        }
        Commands::Chat { sender } => {
            let bot = build_bot(&config)?;
            let ctx = SenderContext::new(sender.clone(), sender);
            chat_loop(&bot, &ctx).await
        }
    }
}

fn build_bot(config: &Config) -> Result<Bot> {
    let profile = Arc::new(config.load_profile()?);
    let classifier = Classifier::new(profile);

    let model: Option<Arc<dyn ModelClient>> = if config.model.enabled {
        info!(model = %config.model.model, "model escalation enabled");
        Some(Arc::new(CompatibleClient::new(
            &config.model.base_url,
            config.model.api_key.as_deref(),
            &config.model.model,
            config.model.temperature,
        )))
    } else {
        None
    };

    let orchestrator = Orchestrator::new(classifier, model)
        .context("failed to build response orchestrator")?
        .with_history_window(config.session.history_window);
    let sessions = SessionStore::new(config.session.max_turns);

    Ok(Bot::new(orchestrator, sessions, Arc::new(LinkExecutor)))
}

async fn chat_loop(bot: &Bot, ctx: &SenderContext) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(b"valet ready. Ctrl-D to quit.\n> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() {
            match bot.handle(line, ctx).await {
                Some(reply) => {
                    stdout.write_all(reply.text.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
                None => stdout.write_all(b"(paused)\n").await?,
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }
    stdout.write_all(b"\nbye\n").await?;
    Ok(())
}
