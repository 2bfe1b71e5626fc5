//! Config sections: where the data lives, query defaults, and logging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Data file locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Chord catalog JSON. No default; commands that need a catalog fail
    /// without one.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Mood/style/mode tables TOML, layered over the built-in tables.
    #[serde(default)]
    pub tables: Option<PathBuf>,
}

/// Values used when a command leaves them unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default: C
    #[serde(default = "DefaultsConfig::default_key")]
    pub key: String,

    /// Default: ionian
    #[serde(default = "DefaultsConfig::default_mode")]
    pub mode: String,

    /// "beginner", "advanced" or "all". Default: all
    #[serde(default = "DefaultsConfig::default_difficulty")]
    pub difficulty: String,

    /// "name", "difficulty", "root" or "quality". Default: name
    #[serde(default = "DefaultsConfig::default_sort_by")]
    pub sort_by: String,

    /// Default: 6
    #[serde(default = "DefaultsConfig::default_max_related")]
    pub max_related: usize,
}

impl DefaultsConfig {
    fn default_key() -> String {
        "C".to_string()
    }

    fn default_mode() -> String {
        "ionian".to_string()
    }

    fn default_difficulty() -> String {
        "all".to_string()
    }

    fn default_sort_by() -> String {
        "name".to_string()
    }

    fn default_max_related() -> usize {
        fretwise::DEFAULT_MAX_RELATED
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            key: Self::default_key(),
            mode: Self::default_mode(),
            difficulty: Self::default_difficulty(),
            sort_by: Self::default_sort_by(),
            max_related: Self::default_max_related(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive. Default: info
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}
