//! Configuration loading for fretwise.
//!
//! Settings are layered; files are loaded in order (later wins):
//! 1. `/etc/fretwise/config.toml` (system)
//! 2. `~/.config/fretwise/config.toml` (user)
//! 3. `./fretwise.toml`, or the path given with `--config`
//! 4. Environment variables (`FRETWISE_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [paths]
//! catalog = "~/guitar/chords.json"
//! tables = "~/guitar/tables.toml"
//!
//! [defaults]
//! key = "G"
//! mode = "mixolydian"
//! difficulty = "beginner"
//! sort_by = "root"
//! max_related = 6
//!
//! [logging]
//! level = "info"
//! ```
//!
//! The catalog and tables are read once at startup into immutable
//! [`fretwise::ChordCatalog`] and [`fretwise::TheoryTables`] values.
//!
//! ```rust,no_run
//! use fretconf::FretConfig;
//!
//! let config = FretConfig::load().expect("Failed to load config");
//! let tables = config.load_tables().expect("Failed to load tables");
//! println!("{} moods", tables.moods.len());
//! ```

pub mod loader;
pub mod settings;
pub mod tables;

pub use loader::{discover_config_files_with_override, expand_path, ConfigSources};
pub use settings::{DefaultsConfig, LoggingConfig, PathsConfig};
pub use tables::{default_tables, load_tables, merge_tables, DEFAULT_TABLES};

use fretwise::{CatalogError, ChordCatalog, ModeError, TheoryTables};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration and data loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid mode in {path}: {source}")]
    Mode {
        path: PathBuf,
        #[source]
        source: ModeError,
    },

    #[error("Invalid chord catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    #[error("No chord catalog configured; set [paths] catalog, FRETWISE_CATALOG or --catalog")]
    NoCatalog,
}

/// Complete fretwise configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FretConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration, reading `config_path` in place of `./fretwise.toml`.
    ///
    /// System and user configs still load first; environment variables
    /// still win.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and return information about sources.
    pub fn load_with_sources() -> Result<(Self, ConfigSources), ConfigError> {
        Self::load_with_sources_from(None)
    }

    pub fn load_with_sources_from(config_path: Option<&Path>) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = FretConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_from_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        debug!(
            files = sources.files.len(),
            env_overrides = sources.env_overrides.len(),
            "loaded configuration"
        );
        Ok((config, sources))
    }

    /// Read and validate the configured chord catalog.
    pub fn load_catalog(&self) -> Result<ChordCatalog, ConfigError> {
        let path = self.paths.catalog.as_deref().ok_or(ConfigError::NoCatalog)?;
        read_catalog(path)
    }

    /// Built-in tables with the configured tables file layered on top.
    pub fn load_tables(&self) -> Result<TheoryTables, ConfigError> {
        load_tables(self.paths.tables.as_deref())
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# fretwise configuration\n\n");

        output.push_str("[paths]\n");
        match &self.paths.catalog {
            Some(path) => output.push_str(&format!("catalog = \"{}\"\n", path.display())),
            None => output.push_str("# catalog = \"~/guitar/chords.json\"\n"),
        }
        match &self.paths.tables {
            Some(path) => output.push_str(&format!("tables = \"{}\"\n", path.display())),
            None => output.push_str("# tables = \"~/guitar/tables.toml\"\n"),
        }

        output.push_str("\n[defaults]\n");
        output.push_str(&format!("key = \"{}\"\n", self.defaults.key));
        output.push_str(&format!("mode = \"{}\"\n", self.defaults.mode));
        output.push_str(&format!("difficulty = \"{}\"\n", self.defaults.difficulty));
        output.push_str(&format!("sort_by = \"{}\"\n", self.defaults.sort_by));
        output.push_str(&format!("max_related = {}\n", self.defaults.max_related));

        output.push_str("\n[logging]\n");
        output.push_str(&format!("level = \"{}\"\n", self.logging.level));

        output
    }
}

/// Read a chord catalog JSON file.
pub fn read_catalog(path: &Path) -> Result<ChordCatalog, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    ChordCatalog::from_json(&json).map_err(|source| ConfigError::Catalog {
        path: path.to_path_buf(),
        source,
    })
}
