use anyhow::Result;
use clap::{Parser, Subcommand};
use jamrun::{Config, DialogueContext};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;

#[derive(Parser)]
#[command(name = "jamrun", version)]
#[command(about = "Arcade runner through Jamaica")]
struct Cli {
    #[arg(short, long, default_value = "jamrun.toml", global = true)]
    config: PathBuf,

    /// Backend base URL (overrides the config file)
    #[arg(long, env = "JAMRUN_API_URL", global = true)]
    api_url: Option<String>,

    /// Player name to register with (overrides the config file)
    #[arg(long, global = true)]
    player: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play interactively (default)
    Play,
    /// List the available tracks
    Tracks,
    /// Show the top players
    Leaderboard {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Fetch a line of dialogue
    Dialogue {
        /// start, victory, defeat or powerup
        #[arg(long, default_value = "start")]
        context: DialogueContext,

        #[arg(long, default_value = "jamaica_country")]
        track: String,
    },
    /// Check that the backend is up
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "jamrun=debug"
    } else {
        "jamrun=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli);

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => commands::play::run(&config).await,
        Command::Tracks => commands::tracks::run(&config).await,
        Command::Leaderboard { limit } => commands::leaderboard::run(&config, limit).await,
        Command::Dialogue { context, track } => {
            commands::dialogue::run(&config, context, &track).await
        }
        Command::Status => commands::status::run(&config).await,
    }
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match Config::load(&cli.config) {
        Ok(c) => {
            debug!("Loaded config from {:?}", cli.config);
            c
        }
        Err(e) if e.is_not_found() => {
            debug!("No config at {:?}, using defaults", cli.config);
            Config::default()
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    };

    if let Some(url) = &cli.api_url {
        config.backend.base_url = url.clone();
    }
    if let Some(name) = &cli.player {
        config.player_name = name.clone();
    }
    config
}
