//! Application configuration from an optional TOML file and the environment.
//!
//! Environment variables:
//!   MEDSTUDY_CONFIG : path to a TOML file (see `AppConfig` for the schema)
//!   MEDSTUDY_DB     : SQLite database path, overrides `database_path`
//!   MEDSTUDY_LANG   : "fr" or "ar", overrides `session.language`
//!   MEDSTUDY_USER   : learner id attached to recorded attempts
//!
//! Example file:
//! ```toml
//! database_path = "study.sqlite3"
//! user_id = "amina"
//!
//! [session]
//! language = "ar"
//! auto_advance = true
//! text_matching = "lenient"
//! unanswered = "exclude_from_total"
//! ```

use crate::models::{Language, SessionConfig};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub user_id: Option<String>,
    pub session: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("db.sqlite3"),
            user_id: None,
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the file named by MEDSTUDY_CONFIG, then applies environment overrides.
    /// A missing or broken file is logged and defaults are used instead.
    pub fn load() -> Self {
        let mut config = match std::env::var("MEDSTUDY_CONFIG") {
            Ok(path) => Self::from_file(&path).unwrap_or_default(),
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    fn from_file(path: &str) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(s) => match Self::from_toml_str(&s) {
                Ok(cfg) => {
                    info!(target: "medstudy", %path, "Loaded config (TOML)");
                    Some(cfg)
                }
                Err(e) => {
                    error!(target: "medstudy", %path, error = %e, "Failed to parse TOML config");
                    None
                }
            },
            Err(e) => {
                error!(target: "medstudy", %path, error = %e, "Failed to read TOML config file");
                None
            }
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Applies MEDSTUDY_DB, MEDSTUDY_LANG and MEDSTUDY_USER as read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("MEDSTUDY_DB").filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(code) = lookup("MEDSTUDY_LANG") {
            match Language::from_code(&code) {
                Some(language) => self.session.language = language,
                None => warn!(target: "medstudy", %code, "Ignoring unknown MEDSTUDY_LANG"),
            }
        }
        if let Some(user) = lookup("MEDSTUDY_USER") {
            let user = user.trim();
            self.user_id = (!user.is_empty()).then(|| user.to_string());
        }
    }
}
