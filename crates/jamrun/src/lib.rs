//! # jamrun
//!
//! Core library for the jamrun arcade runner.
//!
//! This crate provides:
//! - The game model (Mode, Session, Track, Player, Dialogue)
//! - The mode state machine with its scoring and jump rules
//! - A single-threaded event loop that drives the scoring ticks and jump timers
//! - A backend client with timeout and offline fallback data
//!
//! Thresholds and timings are configurable through [`Config`].

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod network;
pub mod prelude;

pub use config::{BackendConfig, Config, ConfigBuilder, DEFAULT_PLAYER_NAME, Rules};
pub use engine::{Command, Engine, EngineHandle, GameSnapshot};
pub use error::{Error, Result};
pub use game::{
    Action, CharacterType, Dialogue, DialogueContext, Difficulty, Game, LocationType, Mode,
    Player, Session, SessionReport, TickOutcome, Track,
};
pub use network::{Backend, Collaborator, Health, HttpClient, RunnerApi};
