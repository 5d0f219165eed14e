//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory (or at `$TASKBOARD_CONFIG`) and includes:
//! - Where board files and client-local preferences live
//! - The project a command acts on when none is given
//! - Columns created for a new board
//! - Whether the one-time keyboard drag hint is shown

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::board::SessionOptions;
use crate::error::{BoardError, Result};
use crate::types::{ProjectId, UserSession};

pub const CONFIG_ENV: &str = "TASKBOARD_CONFIG";
pub const DATA_DIR_ENV: &str = "TASKBOARD_DATA_DIR";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one JSON file per board
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Directory for per-board column preferences and task metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences_dir: Option<PathBuf>,

    #[serde(default = "default_project")]
    pub default_project: String,

    /// Signed-in user; falls back to `$USER`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default = "default_keyboard_hint")]
    pub keyboard_hint: bool,

    #[serde(default = "default_columns")]
    pub default_columns: Vec<String>,
}

fn default_project() -> String {
    "default".to_string()
}

fn default_keyboard_hint() -> bool {
    true
}

fn default_columns() -> Vec<String> {
    ["To do", "In progress", "Done"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            preferences_dir: None,
            default_project: default_project(),
            user: None,
            keyboard_hint: default_keyboard_hint(),
            default_columns: default_columns(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "taskboard")
        .ok_or_else(|| BoardError::Config("cannot determine a home directory".to_string()))
}

fn env_path(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn io_context(path: &Path, action: &str, e: std::io::Error) -> BoardError {
    BoardError::Io(std::io::Error::new(
        e.kind(),
        format!("Failed to {action} config at {}: {e}", path.display()),
    ))
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = env_path(CONFIG_ENV) {
            return Ok(path);
        }
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|e| io_context(path, "read", e))?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_context(parent, "create directory for", e))?;
        }
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| io_context(path, "write", e))
    }

    /// Board directory: `$TASKBOARD_DATA_DIR`, then the config file, then
    /// the platform data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = env_path(DATA_DIR_ENV) {
            return Ok(dir);
        }
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().join("boards")),
        }
    }

    pub fn preferences_dir(&self) -> Result<PathBuf> {
        match &self.preferences_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().join("preferences")),
        }
    }

    pub fn default_project(&self) -> ProjectId {
        ProjectId::from(self.default_project.as_str())
    }

    pub fn user_session(&self) -> UserSession {
        let user_id = self
            .user
            .clone()
            .or_else(|| env::var("USER").ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| "local".to_string());
        UserSession {
            user_id,
            email: None,
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            keyboard_hint: self.keyboard_hint,
        }
    }
}
