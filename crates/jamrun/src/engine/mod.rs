//! Event loop that drives the game.
//!
//! The [`Engine`] owns the [`Game`] and handles one event at a time from a
//! single queue: player commands, scoring ticks, jump expiry and answers from
//! the backend. Nothing else touches the game, so no locking is needed.
//!
//! Timers and backend calls run as spawned tasks that post their result back
//! into the queue. The state machine never waits on them.
//!
//! ## Example
//!
//! ```ignore
//! use jamrun::prelude::*;
//!
//! let config = Config::default();
//! let api = RunnerApi::new(&config.backend)?;
//! let (engine, handle) = Engine::new(&config, api);
//! tokio::spawn(engine.run());
//!
//! handle.wait_for(|s| s.initialized).await;
//! handle.start_race();
//! handle.jump();
//! ```

mod ticker;

use std::future::Future;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{Config, Rules};
use crate::game::{
    Action, Dialogue, DialogueContext, Effect, Game, JumpTicket, Mode, Player, SessionReport,
    TickOutcome, Track, Transition,
};
use crate::network::{Backend, Collaborator};

use ticker::Ticker;

/// Requests accepted by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartRace,
    Pause,
    Resume,
    End,
    Reset,
    RaceAgain,
    Jump,
    SelectTrack(String),
    Shutdown,
}

impl Command {
    fn action(&self) -> Option<Action> {
        match self {
            Self::StartRace => Some(Action::StartRace),
            Self::Pause => Some(Action::Pause),
            Self::Resume => Some(Action::Resume),
            Self::End => Some(Action::End),
            Self::Reset => Some(Action::Reset),
            Self::RaceAgain => Some(Action::RaceAgain),
            Self::Jump | Self::SelectTrack(_) | Self::Shutdown => None,
        }
    }
}

pub(crate) enum Event {
    Command(Command),
    Initialized {
        player: Player,
        tracks: Vec<Track>,
    },
    Tick {
        stint: u64,
    },
    JumpExpired(JumpTicket),
    SessionRegistered {
        race: u64,
        id: String,
    },
    Dialogue {
        race: u64,
        request: u64,
        dialogue: Dialogue,
    },
}

/// Read-only view of the game, published after every handled event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub mode: Mode,
    pub initialized: bool,
    pub score: u64,
    pub distance: u64,
    pub jumping: bool,
    pub player: Option<Player>,
    pub track: Option<Track>,
    /// Names of the tracks that can be selected
    pub track_names: Vec<String>,
    pub dialogue: Option<Dialogue>,
    /// Sequence number of the current race, if one exists
    pub race: Option<u64>,
}

/// Cloneable handle used to talk to a running [`Engine`]
#[derive(Clone)]
pub struct EngineHandle {
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Receiver<GameSnapshot>,
}

impl EngineHandle {
    /// Queue a command. Returns `false` if the engine has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.events.send(Event::Command(command)).is_ok()
    }

    pub fn start_race(&self) -> bool {
        self.send(Command::StartRace)
    }

    pub fn pause(&self) -> bool {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(Command::Resume)
    }

    pub fn end(&self) -> bool {
        self.send(Command::End)
    }

    pub fn reset(&self) -> bool {
        self.send(Command::Reset)
    }

    pub fn race_again(&self) -> bool {
        self.send(Command::RaceAgain)
    }

    pub fn jump(&self) -> bool {
        self.send(Command::Jump)
    }

    pub fn select_track(&self, name: &str) -> bool {
        self.send(Command::SelectTrack(name.to_string()))
    }

    pub fn shutdown(&self) -> bool {
        self.send(Command::Shutdown)
    }

    /// Whether the engine has stopped accepting commands
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a snapshot satisfies `predicate`. `None` if the engine stopped first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&GameSnapshot) -> bool,
    ) -> Option<GameSnapshot> {
        let mut snapshots = self.snapshots.clone();
        snapshots
            .wait_for(predicate)
            .await
            .ok()
            .map(|s| s.clone())
    }
}

pub struct Engine<B> {
    game: Game,
    collaborator: Collaborator<B>,
    player_name: String,
    dialogue: Option<Dialogue>,
    /// Sequence number of the latest dialogue request; older replies are dropped
    dialogue_requests: u64,
    ticker: Option<Ticker>,
    stints: u64,
    events: mpsc::WeakUnboundedSender<Event>,
    inbox: mpsc::UnboundedReceiver<Event>,
    snapshots: watch::Sender<GameSnapshot>,
    tasks: JoinSet<()>,
}

impl<B: Backend> Engine<B> {
    pub fn new(config: &Config, backend: B) -> (Self, EngineHandle) {
        let collaborator = Collaborator::new(backend, config.backend.fallback_timeout());
        Self::with_collaborator(config.rules.clone(), &config.player_name, collaborator)
    }

    pub fn with_collaborator(
        rules: Rules,
        player_name: &str,
        collaborator: Collaborator<B>,
    ) -> (Self, EngineHandle) {
        let (tx, inbox) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(GameSnapshot::default());

        let engine = Self {
            game: Game::new(rules),
            collaborator,
            player_name: player_name.to_string(),
            dialogue: None,
            dialogue_requests: 0,
            ticker: None,
            stints: 0,
            events: tx.downgrade(),
            inbox,
            snapshots,
            tasks: JoinSet::new(),
        };
        let handle = EngineHandle {
            events: tx,
            snapshots: snapshot_rx,
        };
        (engine, handle)
    }

    /// Run until a shutdown command arrives or every handle is dropped.
    ///
    /// Pending session reports get up to the fallback timeout to complete.
    /// Returns the final game state.
    pub async fn run(mut self) -> Game {
        self.initialize();
        self.publish();

        loop {
            tokio::select! {
                event = self.inbox.recv() => {
                    let Some(event) = event else {
                        debug!("All engine handles dropped");
                        break;
                    };
                    let keep_running = self.handle(event);
                    self.publish();
                    if !keep_running {
                        break;
                    }
                }
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        warn!("Background task failed: {}", e);
                    }
                }
            }
        }

        self.ticker = None;
        self.drain().await;
        info!("Engine stopped in {}", self.game.mode());
        self.game
    }

    fn initialize(&mut self) {
        let collaborator = self.collaborator.clone();
        let name = self.player_name.clone();
        self.spawn(async move {
            let (player, tracks) =
                tokio::join!(collaborator.create_player(&name), collaborator.list_tracks());
            Some(Event::Initialized { player, tracks })
        });
    }

    async fn drain(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        debug!("Waiting for {} background task(s)", self.tasks.len());
        let timeout = self.collaborator.timeout();
        let tasks = &mut self.tasks;
        if tokio::time::timeout(timeout, async { while tasks.join_next().await.is_some() {} })
            .await
            .is_err()
        {
            warn!("Abandoning {} background task(s)", tasks.len());
        }
    }

    /// Handle one event to completion. Returns `false` to stop the loop.
    pub(crate) fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Command(Command::Shutdown) => return false,
            Event::Command(Command::Jump) => self.jump(),
            Event::Command(Command::SelectTrack(name)) => {
                if !self.game.select_track(&name) {
                    debug!("Track {} not selectable in {}", name, self.game.mode());
                }
            }
            Event::Command(command) => {
                if let Some(transition) = command.action().and_then(|a| self.game.apply(a)) {
                    self.after_transition(transition);
                }
            }
            Event::Initialized { player, tracks } => {
                if !self.game.is_initialized() {
                    self.game.initialize(player, tracks);
                }
            }
            Event::Tick { stint } => self.tick(stint),
            Event::JumpExpired(ticket) => {
                self.game.land(ticket);
            }
            Event::SessionRegistered { race, id } => {
                if let Some(report) = self.game.attach_session_id(race, id) {
                    self.report(report);
                }
            }
            Event::Dialogue {
                race,
                request,
                dialogue,
            } => {
                if self.game.session().map(|s| s.race()) == Some(race)
                    && request == self.dialogue_requests
                {
                    self.dialogue = Some(dialogue);
                } else {
                    debug!(
                        "Dropping {} dialogue of race {} (request {})",
                        dialogue.context, race, request
                    );
                }
            }
        }
        true
    }

    fn tick(&mut self, stint: u64) {
        if self.ticker.as_ref().map(Ticker::stint) != Some(stint) {
            debug!("Dropping stale tick of stint {}", stint);
            return;
        }
        if let TickOutcome::Finished(transition) = self.game.tick() {
            self.after_transition(transition);
        }
    }

    fn jump(&mut self) {
        let Some(ticket) = self.game.jump() else {
            return;
        };
        let duration = self.game.rules().jump_duration();
        self.spawn(async move {
            tokio::time::sleep(duration).await;
            Some(Event::JumpExpired(ticket))
        });
    }

    fn after_transition(&mut self, transition: Transition) {
        if transition.leaves_playing() {
            // Aborts the task; ticks already queued are dropped by stint
            self.ticker = None;
        }
        if transition.enters_playing() {
            self.stints += 1;
            self.ticker = Some(Ticker::start(
                self.stints,
                self.game.rules().tick_interval(),
                self.events.clone(),
            ));
        }

        match transition.effect {
            Effect::Started(start) => {
                self.dialogue = None;

                let collaborator = self.collaborator.clone();
                let registration = start.clone();
                self.spawn(async move {
                    let id = collaborator.create_session(&registration).await?;
                    Some(Event::SessionRegistered {
                        race: registration.race,
                        id,
                    })
                });

                self.request_dialogue(
                    start.race,
                    DialogueContext::Start,
                    start.track_name,
                    start.player_name,
                );
            }
            Effect::Finished(finish) => {
                let race = finish.report.race;
                if finish.report.session_id.is_some() {
                    self.report(finish.report);
                } else {
                    debug!("Race {} finished before the backend registered it", race);
                }
                self.request_dialogue(race, finish.dialogue, finish.track_name, finish.player_name);
            }
            Effect::Discarded => self.dialogue = None,
            Effect::Suspended | Effect::Resumed => {}
        }
    }

    fn report(&mut self, report: SessionReport) {
        let collaborator = self.collaborator.clone();
        self.spawn(async move {
            collaborator.update_session(&report).await;
            None
        });
    }

    fn request_dialogue(
        &mut self,
        race: u64,
        context: DialogueContext,
        track_name: String,
        player_name: String,
    ) {
        self.dialogue_requests += 1;
        let request = self.dialogue_requests;
        let collaborator = self.collaborator.clone();
        self.spawn(async move {
            let dialogue = collaborator
                .dialogue(context, &track_name, &player_name)
                .await;
            Some(Event::Dialogue {
                race,
                request,
                dialogue,
            })
        });
    }

    /// Run `task` in the background and queue the event it produces
    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Option<Event>> + Send + 'static,
    {
        let Some(events) = self.events.upgrade() else {
            return;
        };
        self.tasks.spawn(async move {
            if let Some(event) = task.await {
                let _ = events.send(event);
            }
        });
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            mode: self.game.mode(),
            initialized: self.game.is_initialized(),
            score: self.game.score(),
            distance: self.game.distance(),
            jumping: self.game.is_jumping(),
            player: self.game.player().cloned(),
            track: self.game.selected_track().cloned(),
            track_names: self
                .game
                .tracks()
                .iter()
                .filter(|t| t.is_unlocked)
                .map(|t| t.name.clone())
                .collect(),
            dialogue: self.dialogue.clone(),
            race: self.game.session().map(|s| s.race()),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}
