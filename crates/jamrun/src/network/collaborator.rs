//! Timeout and fallback policy for backend calls.
//!
//! Every call is bounded by the configured fallback timeout. Whatever goes
//! wrong (unreachable host, error status, malformed body, timeout) is logged
//! and replaced with local data, so the game keeps working offline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::game::{
    Dialogue, DialogueContext, Player, RaceStart, SessionReport, Track,
};
use crate::network::{Backend, DialogueRequest, Health, NewSession};

pub struct Collaborator<B> {
    backend: Arc<B>,
    timeout: Duration,
}

impl<B> Clone for Collaborator<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            timeout: self.timeout,
        }
    }
}

impl<B: Backend> Collaborator<B> {
    pub fn new(backend: B, timeout: Duration) -> Self {
        Self {
            backend: Arc::new(backend),
            timeout,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.timeout)),
        }
    }

    fn fallback<T>(what: &str, result: Result<T>, fallback: impl FnOnce() -> T) -> T {
        result.unwrap_or_else(|e| {
            if e.is_unreachable() {
                warn!("{} failed, backend unreachable ({}), using fallback", what, e);
            } else {
                warn!("{} failed: {}, using fallback", what, e);
            }
            fallback()
        })
    }

    pub async fn create_player(&self, name: &str) -> Player {
        let result = self.bounded(self.backend.create_player(name)).await;
        Self::fallback("Creating player", result, || Player::fallback(name))
    }

    pub async fn get_player(&self, id: &str) -> Option<Player> {
        match self.bounded(self.backend.get_player(id)).await {
            Ok(player) => Some(player),
            Err(e) => {
                warn!("Fetching player {} failed: {}", id, e);
                None
            }
        }
    }

    pub async fn list_tracks(&self) -> Vec<Track> {
        let result = self
            .bounded(self.backend.list_tracks())
            .await
            .and_then(|tracks| {
                if tracks.is_empty() {
                    Err(Error::EmptyTrackList)
                } else {
                    Ok(tracks)
                }
            });
        Self::fallback("Fetching tracks", result, || vec![Track::fallback()])
    }

    /// Register a race with the backend. `None` means the session stays local.
    pub async fn create_session(&self, start: &RaceStart) -> Option<String> {
        let body = NewSession {
            player_id: start.player_id.clone(),
            track_name: start.track_name.clone(),
            character_type: start.character_type,
        };
        match self.bounded(self.backend.create_session(&body)).await {
            Ok(record) => {
                debug!("Race {} registered as session {}", start.race, record.id);
                Some(record.id)
            }
            Err(e) => {
                warn!(
                    "Registering race {} failed: {}, playing offline",
                    start.race, e
                );
                None
            }
        }
    }

    /// Report final numbers. Returns whether the backend accepted them.
    pub async fn update_session(&self, report: &SessionReport) -> bool {
        let Some(session_id) = report.session_id.as_deref() else {
            debug!("Race {} has no backend session, not reporting", report.race);
            return false;
        };
        match self
            .bounded(self.backend.update_session(session_id, report))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Reporting session {} failed: {}", session_id, e);
                false
            }
        }
    }

    pub async fn dialogue(
        &self,
        context: DialogueContext,
        track_name: &str,
        player_name: &str,
    ) -> Dialogue {
        let request = DialogueRequest {
            context,
            track_name: track_name.to_string(),
            player_name: player_name.to_string(),
        };
        let result = self.bounded(self.backend.get_dialogue(&request)).await;
        Self::fallback("Fetching dialogue", result, || Dialogue::fallback(context))
    }

    pub async fn leaderboard(&self, limit: usize) -> Vec<Player> {
        let result = self.bounded(self.backend.leaderboard(limit)).await;
        Self::fallback("Fetching leaderboard", result, Vec::new)
    }

    pub async fn health(&self) -> Result<Health> {
        self.bounded(self.backend.health()).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::CharacterType;
    use crate::network::SessionRecord;
    use std::sync::Mutex;

    /// Scripted in-memory backend. Clones share their call records.
    #[derive(Default, Clone)]
    pub(crate) struct FakeBackend {
        pub offline: bool,
        /// Delay applied to every call
        pub latency: Duration,
        pub tracks: Vec<Track>,
        pub updates: Arc<Mutex<Vec<(String, SessionReport)>>>,
        pub dialogue_requests: Arc<Mutex<Vec<DialogueRequest>>>,
        pub sessions_created: Arc<Mutex<u32>>,
    }

    impl FakeBackend {
        pub(crate) fn online() -> Self {
            Self {
                tracks: vec![Track::fallback()],
                ..Self::default()
            }
        }

        pub(crate) fn unreachable() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        async fn call(&self) -> Result<()> {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.offline {
                return Err(Error::NetworkError("connection refused".to_string()));
            }
            Ok(())
        }

        pub(crate) fn updates(&self) -> Vec<(String, SessionReport)> {
            self.updates.lock().unwrap().clone()
        }

        pub(crate) fn sessions_created(&self) -> u32 {
            *self.sessions_created.lock().unwrap()
        }

        pub(crate) fn dialogue_contexts(&self) -> Vec<DialogueContext> {
            self.dialogue_requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.context)
                .collect()
        }
    }

    impl Backend for FakeBackend {
        async fn create_player(&self, name: &str) -> Result<Player> {
            self.call().await?;
            Ok(Player {
                id: "player-1".to_string(),
                ..Player::fallback(name)
            })
        }

        async fn get_player(&self, id: &str) -> Result<Player> {
            self.call().await?;
            Ok(Player {
                id: id.to_string(),
                high_score: 900,
                ..Player::fallback("Someone")
            })
        }

        async fn list_tracks(&self) -> Result<Vec<Track>> {
            self.call().await?;
            Ok(self.tracks.clone())
        }

        async fn create_session(&self, session: &NewSession) -> Result<SessionRecord> {
            self.call().await?;
            let mut count = self.sessions_created.lock().unwrap();
            *count += 1;
            Ok(SessionRecord {
                id: format!("session-{}", *count),
                player_id: session.player_id.clone(),
                track_name: session.track_name.clone(),
                score: 0,
                distance: 0.0,
                time_played: 0,
                character_type: session.character_type,
                completed: false,
            })
        }

        async fn update_session(&self, session_id: &str, report: &SessionReport) -> Result<()> {
            self.call().await?;
            self.updates
                .lock()
                .unwrap()
                .push((session_id.to_string(), report.clone()));
            Ok(())
        }

        async fn get_dialogue(&self, request: &DialogueRequest) -> Result<Dialogue> {
            self.call().await?;
            self.dialogue_requests.lock().unwrap().push(request.clone());
            Ok(Dialogue {
                context: request.context,
                dialogue: format!("{} line", request.context),
                translation: "translated".to_string(),
                track_name: Some(request.track_name.clone()),
            })
        }

        async fn leaderboard(&self, limit: usize) -> Result<Vec<Player>> {
            self.call().await?;
            Ok((0..limit.min(2))
                .map(|i| Player {
                    id: format!("p{}", i),
                    high_score: 1000 - i as u64 * 100,
                    ..Player::fallback("Runner")
                })
                .collect())
        }

        async fn health(&self) -> Result<Health> {
            self.call().await?;
            Ok(Health {
                message: "Jamaican Racing Game API".to_string(),
                status: "running".to_string(),
            })
        }
    }

    fn start() -> RaceStart {
        RaceStart {
            race: 1,
            player_id: "player-1".to_string(),
            player_name: "General".to_string(),
            track_name: "jamaica_country".to_string(),
            character_type: CharacterType::OnFoot,
        }
    }

    fn report(session_id: Option<&str>) -> SessionReport {
        SessionReport {
            race: 1,
            session_id: session_id.map(str::to_string),
            score: 120,
            distance: 12,
            time_played: 1,
            completed: true,
        }
    }

    #[tokio::test]
    async fn test_online_calls_pass_through() {
        let collab = Collaborator::new(FakeBackend::online(), Duration::from_secs(5));

        let player = collab.create_player("General").await;
        assert_eq!(player.id, "player-1");
        assert_eq!(collab.list_tracks().await, vec![Track::fallback()]);
        assert_eq!(
            collab.create_session(&start()).await.as_deref(),
            Some("session-1")
        );
        assert!(collab.update_session(&report(Some("session-1"))).await);
        assert_eq!(collab.backend().updates().len(), 1);

        let dialogue = collab
            .dialogue(DialogueContext::Start, "jamaica_country", "General")
            .await;
        assert_eq!(dialogue.dialogue, "start line");
        assert_eq!(collab.leaderboard(10).await.len(), 2);
        assert_eq!(collab.health().await.unwrap().status, "running");
        assert_eq!(collab.get_player("p9").await.unwrap().high_score, 900);
    }

    #[tokio::test]
    async fn test_unreachable_falls_back() {
        let collab = Collaborator::new(FakeBackend::unreachable(), Duration::from_secs(5));

        assert_eq!(
            collab.create_player("General Da Jamaican Boy").await,
            Player::fallback("General Da Jamaican Boy")
        );
        assert_eq!(collab.list_tracks().await, vec![Track::fallback()]);
        assert_eq!(collab.create_session(&start()).await, None);
        assert!(!collab.update_session(&report(Some("s"))).await);
        assert_eq!(
            collab
                .dialogue(DialogueContext::Defeat, "jamaica_country", "General")
                .await,
            Dialogue::fallback(DialogueContext::Defeat)
        );
        assert!(collab.leaderboard(10).await.is_empty());
        assert!(collab.get_player("p1").await.is_none());
        assert!(collab.health().await.unwrap_err().is_unreachable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out() {
        let backend = FakeBackend {
            latency: Duration::from_secs(60),
            ..FakeBackend::online()
        };
        let collab = Collaborator::new(backend, Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        let player = collab.create_player("General").await;
        assert!(player.is_offline());
        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_empty_track_list_falls_back() {
        let collab = Collaborator::new(FakeBackend::default(), Duration::from_secs(5));
        assert_eq!(collab.list_tracks().await, vec![Track::fallback()]);
    }

    #[tokio::test]
    async fn test_local_session_is_not_reported() {
        let collab = Collaborator::new(FakeBackend::online(), Duration::from_secs(5));
        assert!(!collab.update_session(&report(None)).await);
        assert!(collab.backend().updates().is_empty());
    }
}
