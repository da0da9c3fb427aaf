use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game::{CharacterType, Dialogue, DialogueContext, Player, SessionReport, Track};

/// Body of a session registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSession {
    pub player_id: String,
    pub track_name: String,
    pub character_type: CharacterType,
}

/// Session as stored by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub player_id: String,
    pub track_name: String,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub time_played: u64,
    pub character_type: CharacterType,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueRequest {
    pub context: DialogueContext,
    pub track_name: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub message: String,
    pub status: String,
}

/// The game backend: player records, track metadata, session tracking and
/// dialogue.
///
/// Implementations report failures as errors; turning those into fallback
/// data is the job of [`Collaborator`](super::Collaborator).
pub trait Backend: Send + Sync + 'static {
    fn create_player(&self, name: &str) -> impl Future<Output = Result<Player>> + Send;

    fn get_player(&self, id: &str) -> impl Future<Output = Result<Player>> + Send;

    /// All tracks; the first one is the default selection
    fn list_tracks(&self) -> impl Future<Output = Result<Vec<Track>>> + Send;

    fn create_session(
        &self,
        session: &NewSession,
    ) -> impl Future<Output = Result<SessionRecord>> + Send;

    fn update_session(
        &self,
        session_id: &str,
        report: &SessionReport,
    ) -> impl Future<Output = Result<()>> + Send;

    fn get_dialogue(
        &self,
        request: &DialogueRequest,
    ) -> impl Future<Output = Result<Dialogue>> + Send;

    /// Top players by high score
    fn leaderboard(&self, limit: usize) -> impl Future<Output = Result<Vec<Player>>> + Send;

    fn health(&self) -> impl Future<Output = Result<Health>> + Send;
}
