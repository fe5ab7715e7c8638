//! Saved settings and high scores
//!
//! Both live in small pretty-printed JSON files. A missing file is not an
//! error: the caller gets defaults or an empty table and the file is created
//! on the next save.

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::game::{GameConfig, HighScoreEntry};

pub const DEFAULT_DATA_DIR: &str = ".snake_arcade";
pub const SETTINGS_FILE: &str = "settings.json";
pub const HIGH_SCORES_FILE: &str = "high_scores.json";

/// Where settings and high scores are read from and written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub settings: PathBuf,
    pub high_scores: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            settings: dir.join(SETTINGS_FILE),
            high_scores: dir.join(HIGH_SCORES_FILE),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

/// Load settings, falling back to defaults when the file does not exist
pub fn load_settings(path: &Path) -> Result<GameConfig> {
    Ok(read_json(path)?.unwrap_or_default())
}

pub fn save_settings(config: &GameConfig, path: &Path) -> Result<()> {
    write_json(config, path)
}

/// Load the high-score table, empty when the file does not exist
pub fn load_high_scores(path: &Path) -> Result<Vec<HighScoreEntry>> {
    Ok(read_json(path)?.unwrap_or_default())
}

pub fn save_high_scores(entries: &[HighScoreEntry], path: &Path) -> Result<()> {
    write_json(&entries, path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {:?}", path));
        }
    };

    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(Some(value))
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Difficulty;
    use chrono::{TimeZone, Utc};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "snake_arcade_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let paths = DataPaths::in_dir(scratch_dir("missing"));
        assert_eq!(load_settings(&paths.settings).unwrap(), GameConfig::default());
        assert!(load_high_scores(&paths.high_scores).unwrap().is_empty());
    }

    #[test]
    fn test_settings_survive_save_and_load() {
        let dir = scratch_dir("settings");
        let paths = DataPaths::in_dir(dir.join("nested"));
        let config = GameConfig {
            difficulty: Difficulty::Hard,
            wrap_mode: true,
            player_name: "ada".to_string(),
            ..GameConfig::small()
        };

        save_settings(&config, &paths.settings).unwrap();
        assert_eq!(load_settings(&paths.settings).unwrap(), config);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_high_scores_survive_save_and_load() {
        let dir = scratch_dir("scores");
        let paths = DataPaths::in_dir(&dir);
        let entries = vec![
            HighScoreEntry {
                name: "ada".to_string(),
                score: 120,
                timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            },
            HighScoreEntry {
                name: "bob".to_string(),
                score: 40,
                timestamp: Utc.timestamp_opt(1_700_000_500, 0).unwrap(),
            },
        ];

        save_high_scores(&entries, &paths.high_scores).unwrap();
        assert_eq!(load_high_scores(&paths.high_scores).unwrap(), entries);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = scratch_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
