use anyhow::Result;
use jamrun::Config;
use owo_colors::OwoColorize;

pub async fn run(config: &Config, limit: usize) -> Result<()> {
    let players = super::collaborator(config)?.leaderboard(limit).await;
    if players.is_empty() {
        println!("No scores yet (or the backend is unreachable)");
        return Ok(());
    }

    for (rank, player) in players.iter().enumerate() {
        let line = format!(
            "{:>3}. {:<20} {:>8} ({} games)",
            rank + 1,
            player.name,
            player.high_score,
            player.total_games
        );
        if rank == 0 {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}
