use anyhow::Result;
use jamrun::{Config, DialogueContext};
use owo_colors::OwoColorize;

pub async fn run(config: &Config, context: DialogueContext, track: &str) -> Result<()> {
    let dialogue = super::collaborator(config)?
        .dialogue(context, track, &config.player_name)
        .await;

    println!("{}", dialogue.dialogue.yellow());
    println!("{}", dialogue.translation.dimmed());
    Ok(())
}
