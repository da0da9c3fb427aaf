//! Game model and the mode state machine.

mod dialogue;
mod enums;
mod jump;
mod player;
mod session;
mod state;
mod track;

pub use dialogue::*;
pub use enums::*;
pub use jump::*;
pub use player::*;
pub use session::*;
pub use state::*;
pub use track::*;
