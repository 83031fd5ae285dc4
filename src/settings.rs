//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockfall/settings.toml (or platform equivalent)

use crate::game::GameConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Fall speed and input timing
    pub timing: TimingSettings,
    /// Player defaults
    pub player: PlayerSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Timing settings, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Fall interval at level 1
    pub start_speed_ms: u64,
    /// Debounce between horizontal moves
    pub move_wait_ms: u64,
    /// Debounce between rotations
    pub rotate_wait_ms: u64,
    /// A key with no repeat event for this long counts as released
    pub key_release_ms: u64,
}

/// Player settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Name pre-filled on the game over screen
    pub name: String,
    /// Fixed piece seed, random when unset
    pub seed: Option<u64>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            rotate: vec!["Up".to_string()],
            soft_drop: vec!["Down".to_string()],
            pause: vec!["p".to_string(), "Esc".to_string()],
            quit: vec!["q".to_string()],
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            start_speed_ms: 800,
            move_wait_ms: 200,
            rotate_wait_ms: 200,
            key_release_ms: 100,
        }
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "blockfall", "blockfall")
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Get the high score file path
    pub fn scores_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("scores.csv"))
    }

    /// Load settings from the config dir, or defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`. Missing or unreadable files give defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to the config dir
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().context("could not determine config directory")?;
        self.save_to(&path)
    }

    /// Save settings to `path`, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create config dir {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Core timings derived from these settings
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            start_speed_ms: self.timing.start_speed_ms.max(1) as f64,
            move_wait: Duration::from_millis(self.timing.move_wait_ms),
            rotate_wait: Duration::from_millis(self.timing.rotate_wait_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("blockfall-settings-{}-{}", std::process::id(), name))
            .join("settings.toml")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from(&temp_path("missing"));
        assert_eq!(settings.timing.start_speed_ms, 800);
        assert_eq!(settings.keys.move_left, vec!["Left".to_string()]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [keys]
            rotate = ["Up", "x"]
            soft_drop = "s"

            [timing]
            start_speed_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(settings.keys.rotate, vec!["Up".to_string(), "x".to_string()]);
        assert_eq!(settings.keys.soft_drop, vec!["s".to_string()]);
        assert_eq!(settings.keys.quit, vec!["q".to_string()]);
        assert_eq!(settings.timing.start_speed_ms, 500);
        assert_eq!(settings.timing.move_wait_ms, 200);
        assert_eq!(settings.player.name, "Player");
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut settings = Settings::default();
        settings.player.name = "ada".to_string();
        settings.player.seed = Some(9);
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.player.name, "ada");
        assert_eq!(loaded.player.seed, Some(9));
        assert_eq!(loaded.keys.pause, settings.keys.pause);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let path = temp_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "timing = 3").unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.timing.start_speed_ms, 800);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_game_config() {
        let mut settings = Settings::default();
        settings.timing.move_wait_ms = 120;
        let config = settings.game_config();
        assert_eq!(config.start_speed_ms, 800.0);
        assert_eq!(config.move_wait, Duration::from_millis(120));
        assert_eq!(config.rotate_wait, Duration::from_millis(200));
    }
}
