//! Chord voicings and the read-only catalog that holds them.
//!
//! Raw records are validated once, at load. After that every voicing has
//! an id, a name, a normalized root, a known quality and at least one
//! note, and the catalog only hands out shared references.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::note::Note;
use crate::quality::ChordQuality;

/// A concrete fingered chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordVoicing {
    pub id: String,
    pub name: String,
    pub root: Note,
    pub quality: ChordQuality,
    /// Pitch classes sounded, first occurrence order, no repeats.
    pub notes: Vec<Note>,
    pub difficulty: u8,
    pub moods: Vec<String>,
    pub styles: Vec<String>,
}

impl ChordVoicing {
    pub fn symbol(&self) -> String {
        format!("{}{}", self.root, self.quality.suffix())
    }

    pub fn has_mood(&self, mood_id: &str) -> bool {
        self.moods.iter().any(|m| m.eq_ignore_ascii_case(mood_id))
    }

    pub fn has_style(&self, style_id: &str) -> bool {
        self.styles.iter().any(|s| s.eq_ignore_ascii_case(style_id))
    }

    /// Number of distinct pitch classes both voicings sound.
    pub fn shared_note_count(&self, other: &ChordVoicing) -> usize {
        self.notes
            .iter()
            .enumerate()
            .filter(|&(i, n)| !self.notes[..i].contains(n) && other.notes.contains(n))
            .count()
    }
}

/// Catalog record as it appears in JSON, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVoicing {
    pub id: Option<String>,
    pub name: Option<String>,
    pub root: Option<String>,
    pub quality: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    pub difficulty: Option<u8>,
    #[serde(default, alias = "moodTags", alias = "mood_tags")]
    pub moods: Vec<String>,
    #[serde(default, alias = "styleTags", alias = "style_tags")]
    pub styles: Vec<String>,
}

impl RawVoicing {
    fn validate(self, index: usize) -> Result<ChordVoicing, CatalogError> {
        let id = required(self.id, index, "id")?;
        let name = required(self.name, index, "name")?;
        let root_name = required(self.root, index, "root")?;
        let quality_name = self
            .quality
            .ok_or(CatalogError::MissingField {
                index,
                field: "quality",
            })?;
        let difficulty = self.difficulty.ok_or(CatalogError::MissingField {
            index,
            field: "difficulty",
        })?;

        let root = root_name.parse::<Note>().map_err(|source| CatalogError::Note {
            id: id.clone(),
            source,
        })?;
        let quality = quality_name
            .parse::<ChordQuality>()
            .map_err(|source| CatalogError::Quality {
                id: id.clone(),
                source,
            })?;

        let mut notes = Vec::with_capacity(self.notes.len());
        for raw in &self.notes {
            let note = raw.parse::<Note>().map_err(|source| CatalogError::Note {
                id: id.clone(),
                source,
            })?;
            notes.push(note);
        }
        dedup_notes(&mut notes);

        let voicing = ChordVoicing {
            id,
            name,
            root,
            quality,
            notes,
            difficulty,
            moods: self.moods,
            styles: self.styles,
        };
        check_voicing(&voicing)?;
        Ok(voicing)
    }
}

fn required(value: Option<String>, index: usize, field: &'static str) -> Result<String, CatalogError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CatalogError::MissingField { index, field }),
    }
}

/// Keep the first occurrence of each pitch class.
fn dedup_notes(notes: &mut Vec<Note>) {
    let mut seen = Vec::with_capacity(notes.len());
    notes.retain(|note| {
        if seen.contains(note) {
            false
        } else {
            seen.push(*note);
            true
        }
    });
}

fn check_voicing(voicing: &ChordVoicing) -> Result<(), CatalogError> {
    if voicing.notes.is_empty() {
        return Err(CatalogError::NoNotes {
            id: voicing.id.clone(),
        });
    }
    if !voicing.notes.contains(&voicing.root) {
        warn!(id = %voicing.id, root = %voicing.root, "voicing does not sound its root");
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<RawVoicing>),
    Wrapped { chords: Vec<RawVoicing> },
}

/// Every known voicing, in load order. Load order is the scan order every
/// query uses, so results are deterministic for a given file.
#[derive(Debug, Clone, Default)]
pub struct ChordCatalog {
    chords: Vec<ChordVoicing>,
}

impl ChordCatalog {
    /// Parse a JSON catalog: either a bare array of records or
    /// `{"chords": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::List(records) | CatalogFile::Wrapped { chords: records } => records,
        };
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<RawVoicing>) -> Result<Self, CatalogError> {
        let chords = records
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.validate(index))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_voicings(chords)
    }

    /// Build from already-typed voicings, checking notes and id uniqueness.
    /// Repeated pitch classes in a voicing are collapsed.
    pub fn from_voicings(mut chords: Vec<ChordVoicing>) -> Result<Self, CatalogError> {
        for chord in &mut chords {
            dedup_notes(&mut chord.notes);
        }

        let mut seen = HashSet::with_capacity(chords.len());
        for chord in &chords {
            check_voicing(chord)?;
            if !seen.insert(chord.id.as_str()) {
                return Err(CatalogError::DuplicateId(chord.id.clone()));
            }
        }

        info!(chords = chords.len(), "loaded chord catalog");
        Ok(Self { chords })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChordVoicing> {
        self.chords.iter()
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ChordVoicing> {
        self.chords.iter().find(|c| c.id == id)
    }

    /// Look up by id, falling back to a case-insensitive name match.
    pub fn find(&self, id_or_name: &str) -> Option<&ChordVoicing> {
        self.get(id_or_name).or_else(|| {
            self.chords
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(id_or_name))
        })
    }
}

impl<'a> IntoIterator for &'a ChordCatalog {
    type Item = &'a ChordVoicing;
    type IntoIter = std::slice::Iter<'a, ChordVoicing>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.iter()
    }
}
