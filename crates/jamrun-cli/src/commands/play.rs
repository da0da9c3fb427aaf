//! Interactive play mode.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute};
use jamrun::{Config, Engine, GameSnapshot, Mode, RunnerApi};
use owo_colors::OwoColorize;
use tracing::info;

use crate::input;

/// Puts the terminal into raw mode for as long as it lives
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive game until the player quits
pub async fn run(config: &Config) -> Result<()> {
    let api = RunnerApi::new(&config.backend).context("Failed to create backend client")?;
    info!("Using backend at {}", api.base_url());

    let (engine, handle) = Engine::new(config, api);
    let engine_task = tokio::spawn(engine.run());

    println!("Connecting to {}...", config.backend.base_url);
    println!(
        "Enter start | Space jump | p pause | r resume | e end | a again | m menu | t track | q quit"
    );

    let raw = RawMode::enable()?;
    let keys = input::spawn_key_reader(handle.clone());

    let mut snapshots = handle.subscribe();
    let mut last_dialogue = None;
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.dialogue != last_dialogue {
            if let Some(dialogue) = &snapshot.dialogue {
                print_line(&format!(
                    "{} ({})",
                    dialogue.dialogue.yellow(),
                    dialogue.translation.dimmed()
                ))?;
            }
            last_dialogue = snapshot.dialogue.clone();
        }
        render_status(&snapshot)?;

        if snapshots.changed().await.is_err() {
            break;
        }
    }

    let game = engine_task.await.context("Engine task failed")?;
    let _ = keys.join();
    drop(raw);

    println!();
    if let Some(player) = game.player() {
        println!(
            "Thanks for running, {} (best: {})",
            player.name, player.high_score
        );
    }
    Ok(())
}

fn print_line(text: &str) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine)
    )?;
    write!(stdout, "{}\r\n", text)?;
    stdout.flush()?;
    Ok(())
}

fn render_status(snapshot: &GameSnapshot) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine)
    )?;
    write!(stdout, "{}", status_line(snapshot))?;
    stdout.flush()?;
    Ok(())
}

fn status_line(snapshot: &GameSnapshot) -> String {
    if !snapshot.initialized {
        return "Loading...".to_string();
    }

    let mode = match snapshot.mode {
        Mode::Playing => snapshot.mode.to_string().green().to_string(),
        Mode::Paused => snapshot.mode.to_string().yellow().to_string(),
        Mode::GameOver => snapshot.mode.to_string().red().to_string(),
        Mode::Menu => snapshot.mode.to_string(),
    };
    let track = snapshot
        .track
        .as_ref()
        .map(|t| t.display_name.as_str())
        .unwrap_or("-");
    let jump = if snapshot.jumping { " JUMP!" } else { "" };

    format!(
        "[{}] {} | score {} | distance {}{}",
        mode, track, snapshot.score, snapshot.distance, jump
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jamrun::Track;

    #[test]
    fn test_status_line_loading() {
        assert_eq!(status_line(&GameSnapshot::default()), "Loading...");
    }

    #[test]
    fn test_status_line_menu() {
        let snapshot = GameSnapshot {
            initialized: true,
            track: Some(Track::fallback()),
            ..GameSnapshot::default()
        };
        assert_eq!(
            status_line(&snapshot),
            "[Menu] Blue Mountain Trail | score 0 | distance 0"
        );
    }

    #[test]
    fn test_status_line_jumping() {
        let snapshot = GameSnapshot {
            initialized: true,
            mode: Mode::Playing,
            score: 80,
            distance: 3,
            jumping: true,
            ..GameSnapshot::default()
        };
        let line = status_line(&snapshot);
        assert!(line.contains("Playing"));
        assert!(line.ends_with("| score 80 | distance 3 JUMP!"));
    }
}
