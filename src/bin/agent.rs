use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coin_grid_agent::config::{AgentConfig, BrokerConfig, Identity};
use coin_grid_agent::constants::{
    DEFAULT_CREDENTIALS_PATH, DEFAULT_LOBBY, DEFAULT_PLAYER, DEFAULT_TEAM,
};
use coin_grid_agent::engine::MoveDecisionEngine;
use coin_grid_agent::transport::{self, AutoController, ManualController};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Player agent for the MQTT coin grid game")]
struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_LOBBY)]
    lobby: String,
    #[arg(long, global = true, default_value = DEFAULT_TEAM)]
    team: String,
    #[arg(long, global = true, default_value = DEFAULT_PLAYER)]
    player: String,
    /// dotenv file with BROKER_ADDRESS, BROKER_PORT, USER_NAME and PASSWORD.
    #[arg(long, global = true, default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials: PathBuf,
    /// Publish START for the lobby one second after joining.
    #[arg(long, global = true)]
    start: bool,
    /// Connect without TLS (local test brokers).
    #[arg(long, global = true)]
    insecure_plaintext: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Mode {
    /// Let the decision engine pick every move.
    Auto {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        show_board: bool,
    },
    /// Type moves on stdin while the board is printed.
    Manual,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let identity =
        Identity::new(&cli.lobby, &cli.team, &cli.player).context("invalid player identity")?;
    let broker = BrokerConfig::load(&cli.credentials, !cli.insecure_plaintext).with_context(|| {
        format!(
            "failed to load broker settings (credentials file {})",
            cli.credentials.display()
        )
    })?;
    let config = AgentConfig::new(broker, identity);

    match cli.mode {
        Mode::Auto { seed, show_board } => {
            let engine = seed
                .map(MoveDecisionEngine::with_seed)
                .unwrap_or_default();
            transport::run(config, AutoController::new(engine, show_board), cli.start).await?;
        }
        Mode::Manual => {
            transport::run(config, ManualController, cli.start).await?;
        }
    }
    Ok(())
}
