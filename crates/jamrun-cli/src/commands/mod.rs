pub mod dialogue;
pub mod leaderboard;
pub mod play;
pub mod status;
pub mod tracks;

use anyhow::{Context, Result};
use jamrun::{Collaborator, Config, RunnerApi};

/// Backend client with the configured timeout and fallbacks
fn collaborator(config: &Config) -> Result<Collaborator<RunnerApi>> {
    let api = RunnerApi::new(&config.backend).context("Failed to create backend client")?;
    Ok(Collaborator::new(api, config.backend.fallback_timeout()))
}
