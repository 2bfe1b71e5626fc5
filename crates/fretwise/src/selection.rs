//! Picking catalog voicings by mood, style or key, plus the difficulty
//! filter and sort orders front ends apply to any result list.

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{ChordCatalog, ChordVoicing};
use crate::note::Note;
use crate::quality::ChordQuality;
use crate::scale::{ProgressionStep, ScaleEngine};
use crate::tables::{ProfileTable, TheoryTables};

/// Where a theory match sits in its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiatonicInfo {
    pub numeral: String,
    pub degree: u8,
    pub is_seventh_chord: bool,
}

/// A catalog voicing that fills a diatonic slot of the requested key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TheoryMatch<'a> {
    pub chord: &'a ChordVoicing,
    pub diatonic: DiatonicInfo,
}

/// A mood/style progression template resolved in a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProgression {
    pub name: String,
    pub steps: Vec<ProgressionStep>,
}

/// Anything that carries a voicing, so filtering and sorting work on plain
/// voicings and on annotated results alike.
pub trait HasVoicing {
    fn voicing(&self) -> &ChordVoicing;
}

impl HasVoicing for ChordVoicing {
    fn voicing(&self) -> &ChordVoicing {
        self
    }
}

impl<T: HasVoicing + ?Sized> HasVoicing for &T {
    fn voicing(&self) -> &ChordVoicing {
        (**self).voicing()
    }
}

impl HasVoicing for TheoryMatch<'_> {
    fn voicing(&self) -> &ChordVoicing {
        self.chord
    }
}

/// Difficulty levels accepted by [`filter_by_difficulty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyLevel {
    /// difficulty ≤ 2
    Beginner,
    /// difficulty ≥ 3
    Advanced,
    All,
}

impl DifficultyLevel {
    /// Anything other than "beginner" or "advanced" means no filtering.
    pub fn parse(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "beginner" => DifficultyLevel::Beginner,
            "advanced" => DifficultyLevel::Advanced,
            _ => DifficultyLevel::All,
        }
    }

    pub fn admits(self, difficulty: u8) -> bool {
        match self {
            DifficultyLevel::Beginner => difficulty <= 2,
            DifficultyLevel::Advanced => difficulty >= 3,
            DifficultyLevel::All => true,
        }
    }
}

pub fn filter_by_difficulty<T: HasVoicing>(chords: Vec<T>, level: &str) -> Vec<T> {
    let level = DifficultyLevel::parse(level);
    if level == DifficultyLevel::All {
        return chords;
    }
    chords
        .into_iter()
        .filter(|c| level.admits(c.voicing().difficulty))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Difficulty,
    Root,
    Quality,
}

impl SortKey {
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => Some(SortKey::Name),
            "difficulty" => Some(SortKey::Difficulty),
            "root" => Some(SortKey::Root),
            "quality" => Some(SortKey::Quality),
            _ => None,
        }
    }
}

/// Fixed order for sorting by quality; anything else sorts after these.
const QUALITY_ORDER: [ChordQuality; 9] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Dominant7,
    ChordQuality::Major7,
    ChordQuality::Minor7,
    ChordQuality::Sus2,
    ChordQuality::Sus4,
    ChordQuality::Diminished,
    ChordQuality::Augmented,
];

fn quality_rank(quality: ChordQuality) -> usize {
    QUALITY_ORDER
        .iter()
        .position(|q| *q == quality)
        .unwrap_or(QUALITY_ORDER.len())
}

/// Stable sort by "name", "difficulty", "root" or "quality". Root and
/// quality ties fall back to name. Unknown keys leave the order alone.
pub fn sort_chords<T: HasVoicing>(mut chords: Vec<T>, sort_by: &str) -> Vec<T> {
    let Some(key) = SortKey::parse(sort_by) else {
        return chords;
    };

    let by_name = |a: &ChordVoicing, b: &ChordVoicing| a.name.cmp(&b.name);
    chords.sort_by(|a, b| {
        let (a, b) = (a.voicing(), b.voicing());
        match key {
            SortKey::Name => by_name(a, b),
            SortKey::Difficulty => a.difficulty.cmp(&b.difficulty),
            SortKey::Root => a
                .root
                .pitch_class()
                .cmp(&b.root.pitch_class())
                .then_with(|| by_name(a, b)),
            SortKey::Quality => quality_rank(a.quality)
                .cmp(&quality_rank(b.quality))
                .then_with(|| by_name(a, b)),
        }
    });
    chords
}

/// Resolves catalog voicings against moods, styles and keys.
#[derive(Debug, Clone, Copy)]
pub struct SelectionEngine<'a> {
    catalog: &'a ChordCatalog,
    tables: &'a TheoryTables,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(catalog: &'a ChordCatalog, tables: &'a TheoryTables) -> Self {
        Self { catalog, tables }
    }

    fn scales(&self) -> ScaleEngine<'a> {
        ScaleEngine::new(&self.tables.modes)
    }

    /// Chords tagged with the mood, or whose quality the mood prefers.
    pub fn chords_by_mood(&self, mood_id: &str) -> Vec<&'a ChordVoicing> {
        self.by_profile(&self.tables.moods, "mood", mood_id, ChordVoicing::has_mood)
    }

    /// Chords tagged with the style, or whose quality the style prefers.
    pub fn chords_by_style(&self, style_id: &str) -> Vec<&'a ChordVoicing> {
        self.by_profile(&self.tables.styles, "style", style_id, ChordVoicing::has_style)
    }

    fn by_profile(
        &self,
        table: &ProfileTable,
        kind: &'static str,
        id: &str,
        tagged: fn(&ChordVoicing, &str) -> bool,
    ) -> Vec<&'a ChordVoicing> {
        let Some(profile) = table.get(id) else {
            warn!(kind, id, "unknown profile id");
            return Vec::new();
        };

        let matches: Vec<&'a ChordVoicing> = self
            .catalog
            .iter()
            .filter(|chord| tagged(*chord, &profile.id) || profile.prefers(chord.quality))
            .collect();

        debug!(kind, id, matches = matches.len(), "selected chords");
        matches
    }

    /// Catalog voicings filling each diatonic slot of `key` in `mode_id`.
    ///
    /// A voicing matches a slot when its root equals the slot root and its
    /// quality is the slot's triad or seventh quality. Results are grouped
    /// by degree; a voicing can appear under more than one degree.
    pub fn chords_by_theory(&self, key: &str, mode_id: &str) -> Vec<TheoryMatch<'a>> {
        let slots = self.scales().diatonic_chords(key, mode_id);
        let mut matches = Vec::new();

        for slot in &slots {
            for chord in self.catalog {
                if chord.root != slot.root {
                    continue;
                }
                let is_triad = chord.quality == slot.triad;
                let is_seventh = chord.quality == slot.seventh;
                if is_triad || is_seventh {
                    matches.push(TheoryMatch {
                        chord,
                        diatonic: DiatonicInfo {
                            numeral: slot.numeral.clone(),
                            degree: slot.degree,
                            is_seventh_chord: is_seventh && !is_triad,
                        },
                    });
                }
            }
        }

        debug!(key, mode = mode_id, matches = matches.len(), "selected diatonic chords");
        matches
    }

    /// Voicings that realise a resolved progression step.
    pub fn voicings_for(&self, step: &ProgressionStep) -> Vec<&'a ChordVoicing> {
        self.voicings_matching(step.slot.root, step.quality())
    }

    fn voicings_matching(&self, root: Note, quality: ChordQuality) -> Vec<&'a ChordVoicing> {
        self.catalog
            .iter()
            .filter(|c| c.root == root && c.quality == quality)
            .collect()
    }

    pub fn progressions_for_mood(&self, mood_id: &str, key: &str, mode_id: &str) -> Vec<ResolvedProgression> {
        self.progressions(&self.tables.moods, mood_id, key, mode_id)
    }

    pub fn progressions_for_style(&self, style_id: &str, key: &str, mode_id: &str) -> Vec<ResolvedProgression> {
        self.progressions(&self.tables.styles, style_id, key, mode_id)
    }

    fn progressions(
        &self,
        table: &ProfileTable,
        id: &str,
        key: &str,
        mode_id: &str,
    ) -> Vec<ResolvedProgression> {
        let Some(profile) = table.get(id) else {
            warn!(id, "unknown profile id");
            return Vec::new();
        };

        let scales = self.scales();
        profile
            .progressions
            .iter()
            .map(|template| ResolvedProgression {
                name: template.name.clone(),
                steps: scales.resolve_progression(key, mode_id, &template.numerals),
            })
            .filter(|p| !p.steps.is_empty())
            .collect()
    }
}
