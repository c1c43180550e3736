use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::MappingError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub titles: TitlesConfig,
    pub resolution: ResolutionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitlesConfig {
    /// Title dump languages to index. Empty keeps all.
    pub languages: Vec<String>,
    /// Fall back to fuzzy scoring when no title matches exactly.
    pub fuzzy_fallback: bool,
    pub fuzzy_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Upper bound on concurrent episode resolutions in a batch.
    pub max_concurrency: usize,
}

impl Config {
    /// Load config: the file at `path` (if it exists) merged over built-in
    /// defaults. Keys the file omits keep their default value.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let user = std::fs::read_to_string(path)?;
        Self::from_toml(&user)
    }

    /// Load from [`Config::config_path`].
    pub fn load_default_location() -> Result<Self, MappingError> {
        Self::load(&Self::config_path())
    }

    /// Parse a TOML document merged over built-in defaults.
    pub fn from_toml(user: &str) -> Result<Self, MappingError> {
        let mut merged: toml::Table = parse_table(DEFAULT_CONFIG)?;
        merge(&mut merged, parse_table(user)?);
        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| MappingError::Config(e.to_string()))
    }

    /// Save to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), MappingError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MappingError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "tsunagi")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

fn parse_table(s: &str) -> Result<toml::Table, MappingError> {
    s.parse::<toml::Table>()
        .map_err(|e| MappingError::Config(e.to_string()))
}

/// Recursively overlay `user` onto `base`; tables merge, other values replace.
fn merge(base: &mut toml::Table, user: toml::Table) {
    for (key, value) in user {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(overlay)) => {
                merge(existing, overlay)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
