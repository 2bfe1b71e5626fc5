//! Mood and style tables.
//!
//! Each mood or style names the chord qualities it favours and a few
//! roman-numeral progression templates. The tables are plain data owned by
//! whoever loaded them; engines only borrow them through [`TheoryTables`].

use serde::{Deserialize, Serialize};

use crate::mode::ModeTable;
use crate::quality::ChordQuality;

/// A named chord progression written in roman numerals ("I", "V", "vi", "IV").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionTemplate {
    pub name: String,
    pub numerals: Vec<String>,
}

impl ProgressionTemplate {
    pub fn new(name: impl Into<String>, numerals: &[&str]) -> Self {
        Self {
            name: name.into(),
            numerals: numerals.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// A mood or style entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preferred_qualities: Vec<ChordQuality>,
    #[serde(default)]
    pub progressions: Vec<ProgressionTemplate>,
}

impl TagProfile {
    pub fn new(id: impl Into<String>, preferred_qualities: &[ChordQuality]) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            preferred_qualities: preferred_qualities.to_vec(),
            progressions: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_progression(mut self, progression: ProgressionTemplate) -> Self {
        self.progressions.push(progression);
        self
    }

    pub fn prefers(&self, quality: ChordQuality) -> bool {
        self.preferred_qualities.contains(&quality)
    }
}

/// Ordered collection of profiles, looked up case-insensitively by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileTable {
    profiles: Vec<TagProfile>,
}

impl ProfileTable {
    pub fn new(profiles: Vec<TagProfile>) -> Self {
        let mut table = Self::default();
        for profile in profiles {
            table.insert(profile);
        }
        table
    }

    /// Add a profile, replacing any existing one with the same id.
    pub fn insert(&mut self, profile: TagProfile) {
        match self
            .profiles
            .iter_mut()
            .find(|p| p.id.eq_ignore_ascii_case(&profile.id))
        {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    pub fn get(&self, id: &str) -> Option<&TagProfile> {
        let id = id.trim();
        self.profiles.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Everything the engines need besides the catalog, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct TheoryTables {
    pub modes: ModeTable,
    pub moods: ProfileTable,
    pub styles: ProfileTable,
}

impl TheoryTables {
    pub fn new(modes: ModeTable, moods: ProfileTable, styles: ProfileTable) -> Self {
        Self {
            modes,
            moods,
            styles,
        }
    }
}
