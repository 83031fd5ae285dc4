//! Keyboard input mapped to per-tick intents
//!
//! Terminals rarely report key releases, so a key counts as held until a
//! release event arrives or no press/repeat has been seen for a short while.

use crate::game::Intents;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Default time after which we consider a key "released" if no repeat received
const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// One-shot commands handled outside the game core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            s if s.chars().count() == 1 => KeyCode::Char(s.chars().next()?),
            other => {
                tracing::warn!(key = other, "unknown key name in bindings, ignoring");
                return None;
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().filter_map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            rotate: Self::parse_keys(&settings.keys.rotate),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            pause: Self::parse_keys(&settings.keys.pause),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec![KeyCode::Left],
            move_right: vec![KeyCode::Right],
            rotate: vec![KeyCode::Up],
            soft_drop: vec![KeyCode::Down],
            pause: vec![KeyCode::Char('p'), KeyCode::Esc],
            quit: vec![KeyCode::Char('q')],
        }
    }
}

/// Keys tracked as held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Held {
    Left = 0,
    Right = 1,
    Rotate = 2,
    Down = 3,
}

/// Turns key events into held-key state
pub struct InputHandler {
    /// Last press or repeat seen for each held key
    last_seen: [Option<Instant>; 4],
    bindings: KeyBindings,
    key_timeout: Duration,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_seen: [None; 4],
            bindings: KeyBindings::default(),
            key_timeout: KEY_TIMEOUT,
        }
    }

    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            last_seen: [None; 4],
            bindings: KeyBindings::from_settings(settings),
            key_timeout: Duration::from_millis(settings.timing.key_release_ms),
        }
    }

    fn held_for(&self, code: KeyCode) -> Option<Held> {
        if self.bindings.move_left.contains(&code) {
            Some(Held::Left)
        } else if self.bindings.move_right.contains(&code) {
            Some(Held::Right)
        } else if self.bindings.rotate.contains(&code) {
            Some(Held::Rotate)
        } else if self.bindings.soft_drop.contains(&code) {
            Some(Held::Down)
        } else {
            None
        }
    }

    /// Handle a key press or repeat. Returns a command for pause/quit keys.
    pub fn key_down(&mut self, key: KeyEvent, now: Instant) -> Option<Command> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);

        if let Some(held) = self.held_for(code) {
            self.last_seen[held as usize] = Some(now);
            // Cancel opposite direction
            match held {
                Held::Left => self.last_seen[Held::Right as usize] = None,
                Held::Right => self.last_seen[Held::Left as usize] = None,
                _ => {}
            }
            None
        } else if self.bindings.pause.contains(&code) {
            Some(Command::Pause)
        } else if self.bindings.quit.contains(&code) {
            Some(Command::Quit)
        } else {
            None
        }
    }

    /// Handle a key release event (many terminals never send these)
    pub fn key_up(&mut self, key: KeyEvent) {
        if let Some(held) = self.held_for(normalize_key(key.code)) {
            self.last_seen[held as usize] = None;
        }
    }

    /// Current intents, dropping keys that timed out
    pub fn intents(&mut self, now: Instant) -> Intents {
        let timeout = self.key_timeout;
        for slot in &mut self.last_seen {
            if let Some(seen) = *slot {
                if now.saturating_duration_since(seen) > timeout {
                    *slot = None;
                }
            }
        }

        Intents {
            move_left: self.last_seen[Held::Left as usize].is_some(),
            move_right: self.last_seen[Held::Right as usize].is_some(),
            rotate: self.last_seen[Held::Rotate as usize].is_some(),
            soft_drop_held: self.last_seen[Held::Down as usize].is_some(),
        }
    }

    /// Clear all held keys (useful for pause/resume)
    pub fn clear(&mut self) {
        self.last_seen = [None; 4];
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(handler: &mut InputHandler, code: KeyCode, now: Instant) -> Option<Command> {
        handler.key_down(KeyEvent::from(code), now)
    }

    #[test]
    fn test_press_sets_intent() {
        let mut input = InputHandler::new();
        let now = Instant::now();
        assert_eq!(press(&mut input, KeyCode::Left, now), None);
        press(&mut input, KeyCode::Down, now);
        let intents = input.intents(now);
        assert!(intents.move_left);
        assert!(intents.soft_drop_held);
        assert!(!intents.move_right);
        assert!(!intents.rotate);
    }

    #[test]
    fn test_key_times_out() {
        let mut input = InputHandler::new();
        let now = Instant::now();
        press(&mut input, KeyCode::Up, now);
        assert!(input.intents(now + Duration::from_millis(50)).rotate);
        assert!(!input.intents(now + Duration::from_millis(150)).rotate);
    }

    #[test]
    fn test_repeat_keeps_key_held() {
        let mut input = InputHandler::new();
        let now = Instant::now();
        press(&mut input, KeyCode::Right, now);
        press(&mut input, KeyCode::Right, now + Duration::from_millis(80));
        assert!(input.intents(now + Duration::from_millis(150)).move_right);
    }

    #[test]
    fn test_release_clears_key() {
        let mut input = InputHandler::new();
        let now = Instant::now();
        press(&mut input, KeyCode::Down, now);
        input.key_up(KeyEvent::from(KeyCode::Down));
        assert!(!input.intents(now).soft_drop_held);
    }

    #[test]
    fn test_opposite_direction_cancels() {
        let mut input = InputHandler::new();
        let now = Instant::now();
        press(&mut input, KeyCode::Left, now);
        press(&mut input, KeyCode::Right, now);
        let intents = input.intents(now);
        assert!(intents.move_right);
        assert!(!intents.move_left);
    }

    #[test]
    fn test_commands() {
        let mut input = InputHandler::new();
        let now = Instant::now();
        assert_eq!(press(&mut input, KeyCode::Char('P'), now), Some(Command::Pause));
        assert_eq!(press(&mut input, KeyCode::Char('q'), now), Some(Command::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.key_down(ctrl_c, now), Some(Command::Quit));
        assert_eq!(input.intents(now), Intents::default());
    }

    #[test]
    fn test_bindings_from_settings() {
        let mut settings = Settings::default();
        settings.keys.rotate = vec!["x".to_string(), "Up".to_string(), "bogus".to_string()];
        let bindings = KeyBindings::from_settings(&settings);
        assert_eq!(bindings.rotate, vec![KeyCode::Char('x'), KeyCode::Up]);
    }
}
