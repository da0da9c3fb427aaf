use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Id given to the locally made-up player when the backend is unavailable
pub const OFFLINE_PLAYER_ID: &str = "temp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub high_score: u64,
    #[serde(default)]
    pub total_games: u64,
    #[serde(default)]
    pub unlocked_tracks: Vec<String>,
    /// UTC, the backend sends it without an offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Player {
    pub fn fallback(name: &str) -> Self {
        Self {
            id: OFFLINE_PLAYER_ID.to_string(),
            name: name.to_string(),
            high_score: 0,
            total_games: 0,
            unlocked_tracks: Vec::new(),
            created_at: None,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.id == OFFLINE_PLAYER_ID
    }
}
