//! Prelude module for convenient imports
//!
//! ```ignore
//! use jamrun::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Engine: `Engine`, `EngineHandle`, `Command`, `GameSnapshot`
//! - Game model: `Game`, `Mode`, `Track`, `Player`, `Dialogue`, `DialogueContext`
//! - Backend: `Backend`, `RunnerApi`, `Collaborator`
//! - Configuration and errors: `Config`, `Rules`, `Error`, `Result`

pub use crate::config::{Config, Rules};
pub use crate::engine::{Command, Engine, EngineHandle, GameSnapshot};
pub use crate::error::{Error, Result};
pub use crate::game::{Dialogue, DialogueContext, Game, Mode, Player, Track};
pub use crate::network::{Backend, Collaborator, RunnerApi};
