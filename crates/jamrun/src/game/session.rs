use serde::Serialize;

use crate::config::Rules;
use crate::game::CharacterType;

/// One race attempt: its identity, metadata and the live counters.
///
/// Counters are only reachable through the state machine, which keeps
/// score and distance frozen outside of Playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    race: u64,
    id: Option<String>,
    player_id: String,
    track_name: String,
    character_type: CharacterType,
    score: u64,
    distance: u64,
    ticks: u64,
    completed: bool,
}

/// Final numbers of a race, as reported to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    #[serde(skip)]
    pub race: u64,
    #[serde(skip)]
    pub session_id: Option<String>,
    pub score: u64,
    pub distance: u64,
    /// Seconds spent in Playing
    pub time_played: u64,
    pub completed: bool,
}

impl Session {
    pub(crate) fn new(
        race: u64,
        player_id: &str,
        track_name: &str,
        character_type: CharacterType,
    ) -> Self {
        Self {
            race,
            id: None,
            player_id: player_id.to_string(),
            track_name: track_name.to_string(),
            character_type,
            score: 0,
            distance: 0,
            ticks: 0,
            completed: false,
        }
    }

    /// Local sequence number of the race this session belongs to
    pub fn race(&self) -> u64 {
        self.race
    }

    /// Backend id, once the backend has registered the session
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    pub fn character_type(&self) -> CharacterType {
        self.character_type
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    pub(crate) fn apply_tick(&mut self, rules: &Rules) {
        self.ticks += 1;
        self.distance += rules.distance_per_tick;
        self.score += rules.score_per_tick;
    }

    pub(crate) fn add_bonus(&mut self, bonus: u64) {
        self.score += bonus;
    }

    /// Mark the session completed. Returns `None` if it already was.
    pub(crate) fn finalize(&mut self, rules: &Rules) -> Option<SessionReport> {
        if self.completed {
            return None;
        }
        self.completed = true;
        Some(self.report(rules))
    }

    pub(crate) fn report(&self, rules: &Rules) -> SessionReport {
        SessionReport {
            race: self.race,
            session_id: self.id.clone(),
            score: self.score,
            distance: self.distance,
            time_played: self.time_played(rules),
            completed: self.completed,
        }
    }

    /// Whole seconds of Playing time, derived from the ticks applied
    pub fn time_played(&self, rules: &Rules) -> u64 {
        let tick_ms = u64::try_from(rules.tick_interval().as_millis()).unwrap_or(u64::MAX);
        self.ticks.saturating_mul(tick_ms) / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(1, "p1", "jamaica_country", CharacterType::OnFoot)
    }

    #[test]
    fn test_new_session_is_zeroed() {
        let s = session();
        assert_eq!(s.score(), 0);
        assert_eq!(s.distance(), 0);
        assert_eq!(s.id(), None);
        assert!(!s.is_completed());
    }

    #[test]
    fn test_tick_and_bonus() {
        let rules = Rules::default();
        let mut s = session();
        s.apply_tick(&rules);
        s.apply_tick(&rules);
        s.add_bonus(rules.jump_bonus);

        assert_eq!(s.distance(), 2);
        assert_eq!(s.score(), 70);
        assert_eq!(s.ticks(), 2);
    }

    #[test]
    fn test_time_played_from_ticks() {
        let rules = Rules::default();
        let mut s = session();
        for _ in 0..25 {
            s.apply_tick(&rules);
        }
        assert_eq!(s.time_played(&rules), 2);
    }

    #[test]
    fn test_time_played_uses_clamped_interval() {
        let rules = Rules {
            tick_interval_ms: 0,
            ..Rules::default()
        };
        let mut s = session();
        for _ in 0..2500 {
            s.apply_tick(&rules);
        }
        assert_eq!(s.time_played(&rules), 2);
    }

    #[test]
    fn test_finalize_once() {
        let rules = Rules::default();
        let mut s = session();
        s.apply_tick(&rules);
        s.set_id("abc".to_string());

        let report = s.finalize(&rules).unwrap();
        assert_eq!(report.session_id.as_deref(), Some("abc"));
        assert_eq!(report.score, 10);
        assert!(report.completed);
        assert!(s.finalize(&rules).is_none());
    }

    #[test]
    fn test_report_wire_shape() {
        let rules = Rules::default();
        let mut s = session();
        s.apply_tick(&rules);
        let report = s.finalize(&rules).unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "score": 10,
                "distance": 1,
                "time_played": 0,
                "completed": true
            })
        );
    }
}
