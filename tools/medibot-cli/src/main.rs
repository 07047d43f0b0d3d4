//! MediBot operator tool
//!
//! Inspect and maintain the profile/history store, and preview the exact
//! prompts MediBot would send to the chat service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use medibot_core::{
    build_sensor_prompt, detect_name, detect_profile, welcome_message, ChatCompleter,
    ChatMessage, ConversationService, HistoryStore, MediBotConfig, MediBotError, Profile,
    ProfileStore,
};
use medibot_storage_sql::SqliteStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (overrides MEDIBOT_DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Environment file to load instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and schema if missing
    Init,
    /// Run the name and profile detectors without storing anything
    Detect {
        /// Transcribed text
        text: String,
    },
    /// Read or write a stored profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Print the most recent turns for a user, oldest first
    History {
        /// User name as stored (capitalized)
        name: String,
        /// Number of turns to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Detect, store the profile and print the chat prompt as JSON
    Prompt {
        /// Transcribed text
        text: String,
    },
    /// Print the sensor interpretation prompt for a JSON payload
    Sensors {
        /// Sensor readings as JSON, e.g. '{"temperatura": 37.5}'
        json: String,
    },
    /// Print the welcome greeting
    Welcome,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Show the stored profile (general when unknown)
    Get {
        /// User name
        name: String,
    },
    /// Store a profile
    Set {
        /// User name
        name: String,
        /// child, elder or general
        profile: Profile,
    },
}

/// Stand-in collaborator: this tool never talks to the chat service
struct NoChatProvider;

#[async_trait]
impl ChatCompleter for NoChatProvider {
    async fn complete(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
    ) -> medibot_core::Result<String> {
        Err(MediBotError::upstream(
            "no chat provider is configured for the operator tool",
        ))
    }
}

fn load_env(cli: &Cli) -> Result<()> {
    match &cli.env_file {
        Some(path) => medibot_core::load_env_from_path(path)?,
        None => medibot_core::load_env()?,
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<MediBotConfig> {
    let mut config = MediBotConfig::from_env()?;
    if let Some(url) = &cli.database_url {
        config = config.with_database_url(url.clone());
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Welcome => println!("{}", welcome_message()),
        Command::Detect { text } => {
            let name = detect_name(text);
            println!("name:    {}", name.as_deref().unwrap_or("<none>"));
            println!("profile: {}", detect_profile(text));
        }
        Command::Sensors { json } => {
            let readings: serde_json::Value =
                serde_json::from_str(json).context("sensor payload is not valid JSON")?;
            let messages = build_sensor_prompt(&readings);
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
        Command::Init => {
            let config = load_config(&cli)?;
            let store = SqliteStore::connect(&config).await?;
            store.close().await;
            println!("Database ready at {}", config.database_url);
        }
        Command::Profile(ProfileCommand::Get { name }) => {
            let config = load_config(&cli)?;
            let store = SqliteStore::connect(&config).await?;
            let profile = store.get_profile(name).await?;
            let known = store.name_exists(name).await?;
            println!(
                "{}: {}{}",
                name,
                profile,
                if known { "" } else { " (not stored)" }
            );
        }
        Command::Profile(ProfileCommand::Set { name, profile }) => {
            let config = load_config(&cli)?;
            let store = SqliteStore::connect(&config).await?;
            store.upsert_profile(name, *profile).await?;
            println!("{}: {}", name, profile);
        }
        Command::History { name, limit } => {
            let config = load_config(&cli)?;
            let limit = limit.unwrap_or(config.history_limit);
            let store = SqliteStore::connect(&config).await?;
            let turns = store.get_recent_turns(name, limit).await?;
            println!("{}", serde_json::to_string_pretty(&turns)?);
        }
        Command::Prompt { text } => {
            let config = load_config(&cli)?;
            let store = Arc::new(SqliteStore::connect(&config).await?);
            let service = ConversationService::new(
                config,
                store.clone(),
                store,
                Arc::new(NoChatProvider),
            )?;
            let prepared = service.prepare(text).await?;
            println!("{}", serde_json::to_string_pretty(&prepared)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let env_loaded = load_env(&cli);
    medibot_core::init_logging();
    tracing::debug!(command = ?cli.command, "medibot starting");

    let outcome = match env_loaded {
        Ok(()) => run(cli).await,
        Err(e) => Err(e),
    };
    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_set() {
        let cli = Cli::try_parse_from(["medibot", "profile", "set", "Juan", "elder"]).unwrap();
        match cli.command {
            Command::Profile(ProfileCommand::Set { name, profile }) => {
                assert_eq!(name, "Juan");
                assert_eq!(profile, Profile::Elder);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_profile() {
        assert!(Cli::try_parse_from(["medibot", "profile", "set", "Juan", "teen"]).is_err());
    }

    #[test]
    fn test_global_database_url() {
        let cli = Cli::try_parse_from([
            "medibot",
            "history",
            "Ana",
            "--limit",
            "3",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert!(matches!(
            cli.command,
            Command::History { limit: Some(3), .. }
        ));
    }

    #[tokio::test]
    async fn test_no_chat_provider_fails_upstream() {
        let err = NoChatProvider.complete("m", &[]).await.unwrap_err();
        assert!(matches!(err, MediBotError::Upstream(_)));
    }
}
