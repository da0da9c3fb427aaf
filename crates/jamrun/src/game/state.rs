//! Game state machine.
//!
//! [`Game`] owns the mode, the current session and the jump flag, so the
//! score/distance invariants are enforced in one place. Every operation is
//! synchronous and returns what changed; timers and backend calls are driven
//! from the outside by the [`Engine`](crate::engine::Engine).
//!
//! Legal transitions:
//!
//! | from     | action     | to       |
//! |----------|------------|----------|
//! | Menu     | start race | Playing  |
//! | Playing  | pause      | Paused   |
//! | Paused   | resume     | Playing  |
//! | Playing  | end / tick | GameOver |
//! | Paused   | reset      | Menu     |
//! | GameOver | reset      | Menu     |
//! | GameOver | race again | Playing  |
//!
//! Anything else is a no-op.

use strum::Display;
use tracing::{debug, info};

use crate::config::Rules;
use crate::game::{
    CharacterType, DialogueContext, JumpState, JumpTicket, Mode, Player, Session, SessionReport,
    Track,
};

/// Player actions that drive mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Action {
    StartRace,
    Pause,
    Resume,
    End,
    Reset,
    RaceAgain,
}

/// A mode change that happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
    pub effect: Effect,
}

impl Transition {
    pub fn enters_playing(&self) -> bool {
        self.to.is_playing() && !self.from.is_playing()
    }

    pub fn leaves_playing(&self) -> bool {
        self.from.is_playing() && !self.to.is_playing()
    }
}

/// What the outside world has to do about a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A new session was created and needs registering with the backend
    Started(RaceStart),
    Suspended,
    Resumed,
    /// The session was finalized
    Finished(Finish),
    /// The session was thrown away
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceStart {
    pub race: u64,
    pub player_id: String,
    pub player_name: String,
    pub track_name: String,
    pub character_type: CharacterType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finish {
    pub report: SessionReport,
    pub player_name: String,
    pub track_name: String,
    pub dialogue: DialogueContext,
}

/// Result of one scoring tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing changed
    Ignored,
    Advanced,
    /// The tick carried the runner past the finish line
    Finished(Transition),
}

/// The single owned game context
#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    mode: Mode,
    initialized: bool,
    player: Option<Player>,
    tracks: Vec<Track>,
    selected: Option<usize>,
    session: Option<Session>,
    jump: JumpState,
    races: u64,
}

impl Game {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            mode: Mode::Menu,
            initialized: false,
            player: None,
            tracks: Vec::new(),
            selected: None,
            session: None,
            jump: JumpState::default(),
            races: 0,
        }
    }

    /// Install the reference data and mark the game ready to start races.
    ///
    /// The first track becomes the selection. An empty list is replaced
    /// with the fallback track.
    pub fn initialize(&mut self, player: Player, mut tracks: Vec<Track>) {
        if tracks.is_empty() {
            tracks.push(Track::fallback());
        }
        info!(
            "Game initialized: player={} ({}), {} track(s)",
            player.name,
            player.id,
            tracks.len()
        );
        self.player = Some(player);
        self.tracks = tracks;
        self.selected = Some(0);
        self.initialized = true;
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.and_then(|i| self.tracks.get(i))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.session.as_ref().map_or(0, Session::score)
    }

    pub fn distance(&self) -> u64 {
        self.session.as_ref().map_or(0, Session::distance)
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_active()
    }

    /// Dispatch an action to its transition
    pub fn apply(&mut self, action: Action) -> Option<Transition> {
        let transition = match action {
            Action::StartRace => self.start_race(),
            Action::Pause => self.pause(),
            Action::Resume => self.resume(),
            Action::End => self.end(),
            Action::Reset => self.reset(),
            Action::RaceAgain => self.race_again(),
        };
        if transition.is_none() {
            debug!("Ignoring {} in {}", action, self.mode);
        }
        transition
    }

    /// Menu → Playing
    pub fn start_race(&mut self) -> Option<Transition> {
        if self.mode != Mode::Menu {
            return None;
        }
        self.begin_race()
    }

    /// GameOver → Playing, with a fresh session
    pub fn race_again(&mut self) -> Option<Transition> {
        if self.mode != Mode::GameOver {
            return None;
        }
        self.begin_race()
    }

    fn begin_race(&mut self) -> Option<Transition> {
        if !self.initialized {
            return None;
        }
        let player = self.player.as_ref()?;
        let track = self.selected.and_then(|i| self.tracks.get(i))?;

        self.races += 1;
        let session = Session::new(self.races, &player.id, &track.name, track.character_type);
        let start = RaceStart {
            race: self.races,
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            track_name: track.name.clone(),
            character_type: track.character_type,
        };
        info!("Race {} started on {}", self.races, track.name);

        self.session = Some(session);
        self.jump.clear();
        Some(self.switch(Mode::Playing, Effect::Started(start)))
    }

    /// Playing → Paused
    pub fn pause(&mut self) -> Option<Transition> {
        if !self.mode.is_playing() {
            return None;
        }
        Some(self.switch(Mode::Paused, Effect::Suspended))
    }

    /// Paused → Playing
    pub fn resume(&mut self) -> Option<Transition> {
        if self.mode != Mode::Paused {
            return None;
        }
        Some(self.switch(Mode::Playing, Effect::Resumed))
    }

    /// Playing → GameOver
    pub fn end(&mut self) -> Option<Transition> {
        if !self.mode.is_playing() {
            return None;
        }
        self.finish()
    }

    fn finish(&mut self) -> Option<Transition> {
        let session = self.session.as_mut()?;
        let report = session.finalize(&self.rules)?;
        let finish = Finish {
            dialogue: DialogueContext::for_result(report.score, self.rules.victory_score),
            player_name: self
                .player
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            track_name: session.track_name().to_string(),
            report,
        };
        info!(
            "Race {} over: score={}, distance={} ({})",
            finish.report.race, finish.report.score, finish.report.distance, finish.dialogue
        );
        Some(self.switch(Mode::GameOver, Effect::Finished(finish)))
    }

    /// Paused | GameOver → Menu
    pub fn reset(&mut self) -> Option<Transition> {
        if !matches!(self.mode, Mode::Paused | Mode::GameOver) {
            return None;
        }
        self.session = None;
        self.jump.clear();
        Some(self.switch(Mode::Menu, Effect::Discarded))
    }

    fn switch(&mut self, to: Mode, effect: Effect) -> Transition {
        let from = self.mode;
        self.mode = to;
        debug!("Mode changed: {} -> {}", from, to);
        Transition { from, to, effect }
    }

    /// Apply one scoring tick. Ends the race once distance passes the finish line.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.mode.is_playing() {
            return TickOutcome::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Ignored;
        };
        session.apply_tick(&self.rules);

        if session.distance() > self.rules.finish_distance {
            return match self.finish() {
                Some(transition) => TickOutcome::Finished(transition),
                None => TickOutcome::Advanced,
            };
        }
        TickOutcome::Advanced
    }

    /// Start a jump. Returns the ticket to land it with, or `None` if the
    /// jump was ignored (not playing, or already airborne).
    pub fn jump(&mut self) -> Option<JumpTicket> {
        if !self.mode.is_playing() {
            return None;
        }
        let session = self.session.as_mut()?;
        let ticket = self.jump.try_start()?;
        session.add_bonus(self.rules.jump_bonus);
        Some(ticket)
    }

    /// Cooldown expiry for the jump identified by `ticket`
    pub fn land(&mut self, ticket: JumpTicket) -> bool {
        self.jump.land(ticket)
    }

    /// Choose the track for the next race by name.
    ///
    /// Only allowed while no race is running, and only for unlocked tracks.
    pub fn select_track(&mut self, name: &str) -> bool {
        if !matches!(self.mode, Mode::Menu | Mode::GameOver) {
            return false;
        }
        match self.tracks.iter().position(|t| t.name == name) {
            Some(index) if self.tracks[index].is_unlocked => {
                self.selected = Some(index);
                true
            }
            Some(_) => {
                debug!("Track {} is locked", name);
                false
            }
            None => false,
        }
    }

    /// Record the backend id of the session of `race`.
    ///
    /// If the race already finished while the id was outstanding, the final
    /// report is returned so it can still be sent.
    pub fn attach_session_id(&mut self, race: u64, id: String) -> Option<SessionReport> {
        let session = self.session.as_mut().filter(|s| s.race() == race)?;
        session.set_id(id);
        session
            .is_completed()
            .then(|| session.report(&self.rules))
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}
