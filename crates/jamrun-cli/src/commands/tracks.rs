use anyhow::Result;
use jamrun::{Config, Track};
use owo_colors::OwoColorize;

pub async fn run(config: &Config) -> Result<()> {
    let tracks = super::collaborator(config)?.list_tracks().await;

    println!("{:<20} {:<24} {:<8} {}", "NAME", "TITLE", "LEVEL", "UNLOCK");
    for track in &tracks {
        println!("{}", format_track(track));
    }
    Ok(())
}

fn format_track(track: &Track) -> String {
    let level = format!("{:<8}", track.difficulty.short_name());
    let level = match parse_hex(track.difficulty.color_code()) {
        Some((r, g, b)) => level.truecolor(r, g, b).to_string(),
        None => level,
    };
    let unlock = if track.is_unlocked {
        "open".to_string()
    } else {
        format!("{} pts", track.unlock_requirement)
    };
    format!(
        "{:<20} {:<24} {} {}",
        track.name, track.display_name, level, unlock
    )
}

/// Parse `#rrggbb` into its components
fn parse_hex(code: &str) -> Option<(u8, u8, u8)> {
    let hex = code.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#00ff80"), Some((0, 255, 128)));
        assert_eq!(parse_hex("00ff80"), None);
        assert_eq!(parse_hex("#0f8"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_format_locked_track() {
        let mut track = Track::fallback();
        track.is_unlocked = false;
        track.unlock_requirement = 1500;
        let line = format_track(&track);
        assert!(line.starts_with("jamaica_country"));
        assert!(line.contains("Blue Mountain Trail"));
        assert!(line.ends_with("1500 pts"));
    }
}
