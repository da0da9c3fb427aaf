use anyhow::{Result, bail};
use jamrun::Config;
use owo_colors::OwoColorize;

pub async fn run(config: &Config) -> Result<()> {
    let base_url = &config.backend.base_url;
    match super::collaborator(config)?.health().await {
        Ok(health) => {
            println!("{} {} ({})", "up".green(), base_url, health.status);
            if !health.message.is_empty() {
                println!("{}", health.message);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "down".red(), base_url);
            bail!("Backend unreachable: {}", e)
        }
    }
}
