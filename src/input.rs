use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Discrete key-down events the session understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Confirm,
    Cancel,
    MoveLeft,
    MoveRight,
    Shoot,
}

/// Everything the player asked for during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub quit: bool,
    pub keys: Vec<Key>,
}

impl InputSnapshot {
    /// Folds raw key events into a snapshot, in arrival order
    pub fn from_key_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = KeyEvent>,
    {
        let mut snapshot = Self::default();
        for key_event in events {
            if key_event.kind != KeyEventKind::Press {
                continue;
            }
            if is_quit(&key_event) {
                snapshot.quit = true;
            } else if let Some(key) = map_key(key_event.code) {
                snapshot.keys.push(key);
            }
        }
        snapshot
    }
}

fn is_quit(key_event: &KeyEvent) -> bool {
    matches!(key_event.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Enter => Some(Key::Confirm),
        KeyCode::Esc => Some(Key::Cancel),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::MoveRight),
        KeyCode::Char(' ') => Some(Key::Shoot),
        _ => None,
    }
}

/// Drains pending terminal events once per frame
#[derive(Debug, Default)]
pub struct InputManager {
    pending: Vec<KeyEvent>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls for all available events without blocking and returns this
    /// frame's snapshot
    pub fn poll(&mut self) -> color_eyre::Result<InputSnapshot> {
        self.pending.clear();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => self.pending.push(key_event),
                // Resize is picked up by the renderer on the next draw
                _ => {}
            }
        }

        Ok(InputSnapshot::from_key_events(self.pending.drain(..)))
    }
}
