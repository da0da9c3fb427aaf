use serde::Deserialize;
use serde_json::json;

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::game::{Dialogue, Player, SessionReport, Track};
use crate::network::{
    Backend, DialogueRequest, Health, HttpClient, NewSession, SessionRecord,
};

/// HTTP implementation of [`Backend`]
#[derive(Clone)]
pub struct RunnerApi {
    client: HttpClient,
}

/// The update endpoint echoes the stored session; only the id is checked
#[derive(Deserialize)]
struct UpdatedSession {
    id: String,
}

impl RunnerApi {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(&config.base_url, config.request_timeout())?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

impl Backend for RunnerApi {
    async fn create_player(&self, name: &str) -> Result<Player> {
        self.client
            .post_json("players", &json!({ "name": name }))
            .await
    }

    async fn get_player(&self, id: &str) -> Result<Player> {
        self.client.get_json(&format!("players/{}", id)).await
    }

    async fn list_tracks(&self) -> Result<Vec<Track>> {
        let tracks: Vec<Track> = self.client.get_json("tracks").await?;
        if tracks.is_empty() {
            return Err(Error::EmptyTrackList);
        }
        Ok(tracks)
    }

    async fn create_session(&self, session: &NewSession) -> Result<SessionRecord> {
        self.client.post_json("game-sessions", session).await
    }

    async fn update_session(&self, session_id: &str, report: &SessionReport) -> Result<()> {
        let updated: UpdatedSession = self
            .client
            .put_json(&format!("game-sessions/{}", session_id), report)
            .await?;
        if updated.id != session_id {
            return Err(Error::NetworkError(format!(
                "Backend updated session {} instead of {}",
                updated.id, session_id
            )));
        }
        Ok(())
    }

    async fn get_dialogue(&self, request: &DialogueRequest) -> Result<Dialogue> {
        self.client.post_json("dialogue", request).await
    }

    async fn leaderboard(&self, limit: usize) -> Result<Vec<Player>> {
        self.client
            .get_json(&format!("leaderboard?limit={}", limit))
            .await
    }

    async fn health(&self) -> Result<Health> {
        self.client.get_json("").await
    }
}
