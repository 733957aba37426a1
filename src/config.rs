//! Application settings
//!
//! Settings live in `config.json` inside the data directory. A missing file
//! means defaults; unknown or missing keys fall back to their defaults too.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::LessonId;
use crate::session::DEFAULT_PLACEHOLDER;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine data directory")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Database file name, relative to the data directory unless absolute
    pub database_file: PathBuf,
    /// Shown in place of a missing decoy answer
    pub answer_placeholder: String,
    /// Lesson opened when none is given
    pub default_lesson: LessonId,
    /// Insert the sample lessons into an empty store on start-up
    pub seed_on_start: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_file: PathBuf::from("fiszki.db"),
            answer_placeholder: DEFAULT_PLACEHOLDER.to_string(),
            default_lesson: 1,
            seed_on_start: true,
        }
    }
}

impl AppConfig {
    /// Resolve the database path against the data directory
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        if self.database_file.is_absolute() {
            self.database_file.clone()
        } else {
            data_dir.join(&self.database_file)
        }
    }
}

/// Default data directory (e.g., ~/.local/share/fiszki)
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join("fiszki"))
        .ok_or(ConfigError::DataDirNotFound)
}

/// Get the settings file path
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.json")
}

/// Load settings from the data directory
pub fn load_config(data_dir: &Path) -> Result<AppConfig> {
    let path = config_path(data_dir);

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save settings to the data directory
pub fn save_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_path(data_dir), content)?;
    Ok(())
}
