//! Loading mood, style and custom mode tables.
//!
//! A tables file looks like:
//!
//! ```toml
//! [moods.wistful]
//! name = "Wistful"
//! preferred_qualities = ["minor7", "maj7"]
//!
//! [[moods.wistful.progressions]]
//! name = "drift"
//! numerals = ["vi7", "IV7", "I"]
//!
//! [modes.dorian-b2]
//! intervals = [0, 1, 3, 5, 7, 9, 10]
//! triads = ["minor", "augmented", "major", "major", "minor", "diminished", "minor"]
//! sevenths = ["minor-major7", "augmented-major7", "dominant7", "dominant7", "minor7", "half-diminished", "minor7"]
//! numerals = ["i", "II+", "III", "IV", "v", "vi°", "vii"]
//! ```
//!
//! Files are layered over the built-in tables: an entry replaces the
//! built-in entry with the same id and anything else is added.

use std::collections::BTreeMap;
use std::path::Path;

use fretwise::{ChordQuality, ModeDefinition, ModeSpec, ModeTable, ProgressionTemplate, TagProfile, TheoryTables};
use serde::Deserialize;
use tracing::info;

use crate::ConfigError;

/// Built-in moods and styles.
pub const DEFAULT_TABLES: &str = include_str!("default_tables.toml");

#[derive(Debug, Default, Deserialize)]
struct TablesFile {
    #[serde(default)]
    moods: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    styles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    modes: BTreeMap<String, ModeSpec>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileEntry {
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    preferred_qualities: Vec<ChordQuality>,
    #[serde(default)]
    progressions: Vec<ProgressionTemplate>,
}

impl ProfileEntry {
    fn into_profile(self, id: String) -> TagProfile {
        let name = self.name.unwrap_or_else(|| id.clone());
        TagProfile {
            id,
            name,
            description: self.description,
            preferred_qualities: self.preferred_qualities,
            progressions: self.progressions,
        }
    }
}

/// The standard modes plus the built-in moods and styles.
pub fn default_tables() -> Result<TheoryTables, ConfigError> {
    let mut tables = TheoryTables::new(ModeTable::standard(), Default::default(), Default::default());
    merge_tables(&mut tables, DEFAULT_TABLES, Path::new("<built-in tables>"))?;
    Ok(tables)
}

/// Built-in tables, with `path` layered on top when given.
pub fn load_tables(path: Option<&Path>) -> Result<TheoryTables, ConfigError> {
    let mut tables = default_tables()?;
    if let Some(path) = path {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        merge_tables(&mut tables, &contents, path)?;
    }

    info!(
        modes = tables.modes.len(),
        moods = tables.moods.len(),
        styles = tables.styles.len(),
        "loaded theory tables"
    );
    Ok(tables)
}

/// Parse a tables document and insert its entries into `tables`.
pub fn merge_tables(tables: &mut TheoryTables, contents: &str, origin: &Path) -> Result<(), ConfigError> {
    let file: TablesFile = toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    for (id, spec) in &file.modes {
        let mode = ModeDefinition::from_spec(id, spec).map_err(|source| ConfigError::Mode {
            path: origin.to_path_buf(),
            source,
        })?;
        tables.modes.insert(mode);
    }
    for (id, entry) in file.moods {
        tables.moods.insert(entry.into_profile(id));
    }
    for (id, entry) in file.styles {
        tables.styles.insert(entry.into_profile(id));
    }
    Ok(())
}
