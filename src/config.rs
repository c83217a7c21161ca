//! `config.json` next to the database.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::db::connection;
use crate::error::TodoError;
use crate::schedule::locale::{self, DEFAULT_LOCALE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_list_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Config {
    /// Read the config; a missing file is an empty config.
    pub fn load() -> Result<Self, TodoError> {
        Self::load_from(&connection::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, TodoError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TodoError::config(format!("Invalid config {}: {e}", path.display())))
    }

    pub fn save(&self) -> Result<(), TodoError> {
        self.save_to(&connection::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), TodoError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Locale in effect: flag, then config, then `$LANG`, then English.
pub fn resolve_locale(flag: Option<&str>, config: &Config) -> String {
    let env_lang = std::env::var("LANG").ok();
    pick_locale(flag, config.locale.as_deref(), env_lang.as_deref())
}

fn pick_locale(flag: Option<&str>, configured: Option<&str>, env_lang: Option<&str>) -> String {
    let env_lang =
        env_lang.filter(|l| !matches!(locale::normalize(l).as_str(), "" | "c" | "posix"));
    [flag, configured, env_lang]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(locale::normalize)
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}
