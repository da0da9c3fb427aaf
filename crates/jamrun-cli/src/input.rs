use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use jamrun::{Command, EngineHandle, GameSnapshot};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Spawn a thread that turns key presses into engine commands.
///
/// The thread stops after sending a shutdown (Esc, q, Q, Ctrl+C) or once the
/// engine no longer accepts commands.
///
/// Returns a JoinHandle that can be used to wait for the thread to finish.
pub fn spawn_key_reader(handle: EngineHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Key reader started");

        loop {
            // Poll with a timeout so a stopped engine is noticed
            let command = if event::poll(Duration::from_millis(100)).unwrap_or(false)
                && let Ok(Event::Key(key_event)) = event::read()
                && key_event.kind == KeyEventKind::Press
            {
                command_for(&key_event, &handle.snapshot())
            } else {
                None
            };

            match command {
                Some(Command::Shutdown) => {
                    debug!("Quit key pressed");
                    handle.shutdown();
                    break;
                }
                Some(command) => {
                    if !handle.send(command) {
                        break;
                    }
                }
                None => {
                    if handle.is_closed() {
                        break;
                    }
                }
            }
        }

        debug!("Key reader stopped");
    })
}

/// Map a key to the command it stands for in the current game state.
fn command_for(event: &KeyEvent, snapshot: &GameSnapshot) -> Option<Command> {
    let command = match event.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Command::Shutdown,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Command::Shutdown
        }
        KeyCode::Enter | KeyCode::Char('s') => Command::StartRace,
        KeyCode::Char(' ') | KeyCode::Up => Command::Jump,
        KeyCode::Char('p') => Command::Pause,
        KeyCode::Char('r') => Command::Resume,
        KeyCode::Char('e') => Command::End,
        KeyCode::Char('m') => Command::Reset,
        KeyCode::Char('a') => Command::RaceAgain,
        KeyCode::Char('t') => Command::SelectTrack(next_track(snapshot)?),
        _ => return None,
    };
    Some(command)
}

/// Name of the track after the selected one, wrapping around
fn next_track(snapshot: &GameSnapshot) -> Option<String> {
    let names = &snapshot.track_names;
    if names.len() < 2 {
        return None;
    }
    let current = snapshot
        .track
        .as_ref()
        .and_then(|t| names.iter().position(|n| *n == t.name))
        .unwrap_or(0);
    Some(names[(current + 1) % names.len()].clone())
}
