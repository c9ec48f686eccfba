//! Deckhand CLI - Pitch deck assistant in the terminal
//!
//! Chat with the assistant until enough is known about your startup, then
//! generate an investor deck.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};

use api::{DeckhandClient, GenerateDeckRequest, TurnRequest};
use config::Config;

const BAR_WIDTH: usize = 20;

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(about = "Deckhand CLI - Build a pitch deck through conversation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
        /// Server URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Talk to the assistant
    Chat {
        /// Conversation to resume (defaults to the last one)
        #[arg(short, long)]
        conversation: Option<String>,
        /// Start a fresh conversation
        #[arg(long)]
        new: bool,
    },

    /// Show a conversation's progress and transcript
    Show {
        /// Conversation ID (defaults to the last one)
        conversation: Option<String>,
        /// Print the full transcript
        #[arg(short, long)]
        transcript: bool,
    },

    /// Generate a pitch deck from a conversation
    Generate {
        /// Conversation ID (defaults to the last one)
        conversation: Option<String>,
    },

    /// Show or change configuration
    Config {
        /// Set the server URL
        #[arg(long)]
        url: Option<String>,
        /// Set the owner id sent with requests
        #[arg(long)]
        owner: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key, url } => cmd_login(key, url).await,
        Commands::Chat { conversation, new } => cmd_chat(conversation, new).await,
        Commands::Show {
            conversation,
            transcript,
        } => cmd_show(conversation, transcript).await,
        Commands::Generate { conversation } => cmd_generate(conversation).await,
        Commands::Config { url, owner } => cmd_config(url, owner),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = url {
        config.base_url = url;
    }

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = DeckhandClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to Deckhand API at {}", config.base_url);
        }
    }

    config.set_api_key(api_key);
    config.ensure_owner_id();
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);
    println!("\n{}", "Start with:".dimmed());
    println!("  deckhand chat");

    Ok(())
}

async fn cmd_chat(conversation: Option<String>, new: bool) -> Result<()> {
    let mut config = Config::load()?;
    let (owner_id, created) = config.ensure_owner_id();
    if created {
        config.save()?;
    }

    let client = DeckhandClient::new(&config.base_url, config.api_key.as_deref());
    let mut conversation_id = if new {
        None
    } else {
        conversation.or_else(|| config.last_conversation_id.clone())
    };

    println!(
        "{}",
        "Tell me about your startup. Type a number to pick a suggestion, /quit to leave."
            .dimmed()
    );

    let mut suggestions: Vec<String> = Vec::new();

    loop {
        let line: String = Input::new()
            .with_prompt("You".cyan().to_string())
            .interact_text()
            .context("Failed to read input")?;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "/quit" | "/exit") {
            break;
        }

        let message = pick_suggestion(line, &suggestions).unwrap_or(line).to_string();

        let reply = client
            .send_message(&TurnRequest {
                conversation_id: conversation_id.as_deref(),
                message: &message,
                owner_id: &owner_id,
            })
            .await?;

        let id = reply.conversation_id.to_string();
        if config.last_conversation_id.as_deref() != Some(id.as_str()) {
            config.last_conversation_id = Some(id.clone());
            config.save()?;
        }
        conversation_id = Some(id);

        println!("\n{} {}", "Deckhand:".green().bold(), reply.message);
        for (i, suggestion) in reply.suggestions.iter().enumerate() {
            println!("  {} {}", format!("[{}]", i + 1).dimmed(), suggestion);
        }
        println!("  {}\n", progress_bar(reply.completeness).dimmed());

        suggestions = reply.suggestions;

        if reply.ready_to_generate
            && Confirm::new()
                .with_prompt("You have enough for a deck. Generate it now?")
                .default(false)
                .interact()
                .context("Failed to read input")?
        {
            generate(&client, &reply.collected_data, &owner_id).await?;
            break;
        }
    }

    Ok(())
}

async fn cmd_show(conversation: Option<String>, transcript: bool) -> Result<()> {
    let config = Config::load()?;
    let owner_id = config
        .owner_id
        .as_deref()
        .context("No owner id yet. Run 'deckhand chat' first.")?;
    let conversation_id = conversation
        .or_else(|| config.last_conversation_id.clone())
        .context("No conversation specified and none to resume.")?;

    let client = DeckhandClient::new(&config.base_url, config.api_key.as_deref());
    let conversation = client
        .get_conversation(&conversation_id, owner_id)
        .await?;

    println!(
        "{} {} [{}]",
        "Conversation".bold(),
        conversation.id.to_string().dimmed(),
        conversation.status.cyan()
    );
    println!("  {}", progress_bar(conversation.completeness));

    if !conversation.collected_data.is_empty() {
        println!("\n{}", "Collected:".bold());
        for (key, value) in &conversation.collected_data {
            println!("  {} {}", format!("{}:", key).cyan(), truncate_string(value, 70));
        }
    }

    if !conversation.missing_fields.is_empty() {
        println!("\n{}", "Still needed:".bold());
        for field in &conversation.missing_fields {
            println!("  {}", field.yellow());
        }
    }

    if transcript {
        println!("\n{}", "Transcript:".bold());
        for entry in &conversation.messages {
            let Some(content) = entry.content.as_deref().filter(|c| !c.is_empty()) else {
                continue;
            };
            match entry.role.as_str() {
                "user" => println!("  {} {}", "You:".cyan(), content),
                "assistant" => println!("  {} {}", "Deckhand:".green(), content),
                _ => {}
            }
        }
    }

    if conversation.ready_to_generate {
        println!("\n{}", "Ready! Run 'deckhand generate' to build the deck.".green());
    }

    Ok(())
}

async fn cmd_generate(conversation: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let owner_id = config
        .owner_id
        .as_deref()
        .context("No owner id yet. Run 'deckhand chat' first.")?;
    let conversation_id = conversation
        .or_else(|| config.last_conversation_id.clone())
        .context("No conversation specified and none to resume.")?;

    let client = DeckhandClient::new(&config.base_url, config.api_key.as_deref());
    let conversation = client
        .get_conversation(&conversation_id, owner_id)
        .await?;

    if !conversation.ready_to_generate {
        println!(
            "{} Only {}% collected (missing: {})",
            "!".yellow(),
            conversation.completeness,
            conversation.missing_fields.join(", ")
        );
        if !Confirm::new()
            .with_prompt("Generate anyway?")
            .default(false)
            .interact()
            .context("Failed to read input")?
        {
            return Ok(());
        }
    }

    generate(&client, &conversation.collected_data, owner_id).await
}

async fn generate(
    client: &DeckhandClient,
    collected_data: &std::collections::BTreeMap<String, String>,
    owner_id: &str,
) -> Result<()> {
    println!("Generating deck... ");

    let deck = client
        .generate_deck(&GenerateDeckRequest {
            collected_data,
            owner_id,
        })
        .await?;

    println!(
        "{} '{}' ({} slides) saved as {}",
        "✓".green(),
        deck.title.cyan().bold(),
        deck.slide_count,
        deck.artifact_id.to_string().dimmed()
    );

    Ok(())
}

fn cmd_config(url: Option<String>, owner: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if url.is_some() || owner.is_some() {
        if let Some(url) = url {
            config.base_url = url;
        }
        if let Some(owner) = owner {
            config.owner_id = Some(owner);
        }
        config.save()?;
        println!("{} Configuration updated", "✓".green());
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!(
        "  Owner: {}",
        config.owner_id.as_deref().unwrap_or("None").cyan()
    );
    println!(
        "  Last Conversation: {}",
        config.last_conversation_id.as_deref().unwrap_or("None")
    );

    Ok(())
}

/// Resolve "1".."n" to the matching quick reply
fn pick_suggestion<'a>(input: &str, suggestions: &'a [String]) -> Option<&'a str> {
    let index: usize = input.parse().ok()?;
    suggestions
        .get(index.checked_sub(1)?)
        .map(String::as_str)
}

fn progress_bar(completeness: u8) -> String {
    let percent = usize::from(completeness.min(100));
    let filled = percent * BAR_WIDTH / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}
