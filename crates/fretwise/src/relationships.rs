//! Ranking how closely catalog chords relate to a chosen chord.
//!
//! Each candidate is checked against every heuristic at once (circle of
//! fifths, relative major/minor, ii–V and V–I motion, shared key, same
//! root). Every heuristic that fires contributes its weight, so a G major
//! next to C major scores as both a fifth away and in the same key.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{ChordCatalog, ChordVoicing};
use crate::note::semitone_distance;
use crate::quality::ChordQuality;

pub const DEFAULT_MAX_RELATED: usize = 6;

const CIRCLE_OF_FIFTHS_SCORE: u32 = 100;
const RELATIVE_SCORE: u32 = 95;
const RESOLUTION_SCORE: u32 = 90;
const PROGRESSION_SCORE: u32 = 85;
const SAME_ROOT_SCORE: u32 = 75;
const DIATONIC_SCORE: u32 = 70;
const SHARED_NOTES_BASE: u32 = 40;
const SHARED_NOTE_SCORE: u32 = 10;
const BASIC_TRIAD_BONUS: u32 = 10;
const EASY_CHORD_BONUS: u32 = 5;
/// Score given to same-root chords appended when too few related chords exist.
pub const BACKFILL_SCORE: u32 = 50;

/// Chords expected on each degree of a major key, by semitones above the tonic.
const MAJOR_KEY_CHORDS: [(u8, ChordQuality); 6] = [
    (2, ChordQuality::Minor),
    (4, ChordQuality::Minor),
    (5, ChordQuality::Major),
    (7, ChordQuality::Major),
    (9, ChordQuality::Minor),
    (11, ChordQuality::Diminished),
];

/// Chords expected on each degree of a natural minor key.
const MINOR_KEY_CHORDS: [(u8, ChordQuality); 6] = [
    (2, ChordQuality::Diminished),
    (3, ChordQuality::Major),
    (5, ChordQuality::Minor),
    (7, ChordQuality::Minor),
    (8, ChordQuality::Major),
    (10, ChordQuality::Major),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    SameRoot,
    CircleOfFifths,
    Relative,
    Resolution,
    Progression,
    Diatonic,
    SharedNotes,
}

impl RelationshipKind {
    pub fn id(self) -> &'static str {
        match self {
            RelationshipKind::SameRoot => "same-root",
            RelationshipKind::CircleOfFifths => "circle-of-fifths",
            RelationshipKind::Relative => "relative",
            RelationshipKind::Resolution => "resolution",
            RelationshipKind::Progression => "progression",
            RelationshipKind::Diatonic => "diatonic",
            RelationshipKind::SharedNotes => "shared-notes",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub label: String,
}

impl Relationship {
    fn new(kind: RelationshipKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }
}

/// A catalog chord ranked against a source chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedChord<'a> {
    pub chord: &'a ChordVoicing,
    pub relationships: Vec<Relationship>,
    pub score: u32,
    /// Label of the first relationship detected.
    pub primary_label: String,
}

impl RelatedChord<'_> {
    pub fn has(&self, kind: RelationshipKind) -> bool {
        self.relationships.iter().any(|r| r.kind == kind)
    }

    /// One-line explanation: "G Major: V chord, same key (score 185)".
    pub fn describe(&self) -> String {
        let labels: Vec<&str> = self.relationships.iter().map(|r| r.label.as_str()).collect();
        format!("{}: {} (score {})", self.chord.name, labels.join(", "), self.score)
    }
}

fn expected_in_key(source: ChordQuality, distance: u8) -> Option<ChordQuality> {
    let table: &[(u8, ChordQuality)] = match source {
        ChordQuality::Major => &MAJOR_KEY_CHORDS,
        ChordQuality::Minor => &MINOR_KEY_CHORDS,
        _ => return None,
    };
    table
        .iter()
        .find(|(interval, _)| *interval == distance)
        .map(|(_, quality)| *quality)
}

/// Every relationship from `source` to `target`, in detection order.
///
/// Shared notes only count when nothing else relates the two chords.
pub fn relationship_type(source: &ChordVoicing, target: &ChordVoicing) -> Vec<Relationship> {
    use crate::quality::ChordQuality::{Dominant7, Major, Minor};

    let distance = semitone_distance(source.root, target.root);
    let mut found = Vec::new();

    if distance == 0 && source.quality != target.quality {
        found.push(Relationship::new(
            RelationshipKind::SameRoot,
            target.quality.variant_label(),
        ));
    }

    match distance {
        7 => found.push(Relationship::new(RelationshipKind::CircleOfFifths, "V chord")),
        5 => found.push(Relationship::new(RelationshipKind::CircleOfFifths, "IV chord")),
        _ => {}
    }

    let relative = matches!(
        (source.quality, target.quality, distance),
        (Major, Minor, 9) | (Minor, Major, 3)
    );
    if relative {
        found.push(Relationship::new(RelationshipKind::Relative, "relative"));
    }

    if source.quality == Minor && matches!(target.quality, Dominant7 | Major) && distance == 7 {
        found.push(Relationship::new(RelationshipKind::Progression, "V of ii-V"));
    }

    if source.quality == Dominant7 && distance == 5 {
        found.push(Relationship::new(RelationshipKind::Resolution, "resolves to"));
    }

    if expected_in_key(source.quality, distance) == Some(target.quality) {
        found.push(Relationship::new(RelationshipKind::Diatonic, "same key"));
    }

    if found.is_empty() {
        let shared = source.shared_note_count(target);
        if shared >= 2 {
            found.push(Relationship::new(
                RelationshipKind::SharedNotes,
                format!("{shared} shared notes"),
            ));
        }
    }

    found
}

/// Sum of every matched relationship's weight, plus one-off bonuses for
/// plain major/minor targets and easy voicings.
pub fn score(source: &ChordVoicing, target: &ChordVoicing, relationships: &[Relationship]) -> u32 {
    let mut total: u32 = relationships
        .iter()
        .map(|r| match r.kind {
            RelationshipKind::CircleOfFifths => CIRCLE_OF_FIFTHS_SCORE,
            RelationshipKind::Relative => RELATIVE_SCORE,
            RelationshipKind::Resolution => RESOLUTION_SCORE,
            RelationshipKind::Progression => PROGRESSION_SCORE,
            RelationshipKind::SameRoot => SAME_ROOT_SCORE,
            RelationshipKind::Diatonic => DIATONIC_SCORE,
            RelationshipKind::SharedNotes => {
                SHARED_NOTES_BASE + SHARED_NOTE_SCORE * source.shared_note_count(target) as u32
            }
        })
        .sum();

    if target.quality.is_basic_triad() {
        total += BASIC_TRIAD_BONUS;
    }
    if target.difficulty <= 2 {
        total += EASY_CHORD_BONUS;
    }
    total
}

fn is_same_chord(a: &ChordVoicing, b: &ChordVoicing) -> bool {
    a.id == b.id || a.name == b.name
}

/// The `max_results` chords most closely related to `source`.
///
/// The catalog is collapsed to the first voicing of each chord name, then
/// every other chord is checked with [`relationship_type`] and sorted by
/// score, highest first. Equal scores keep catalog order.
///
/// When fewer than `max_results` chords relate, remaining same-root chords
/// are appended at [`BACKFILL_SCORE`] in catalog order. They go after the
/// sorted list and are not merged into it.
pub fn related_chords<'a, I>(source: &ChordVoicing, catalog: I, max_results: usize) -> Vec<RelatedChord<'a>>
where
    I: IntoIterator<Item = &'a ChordVoicing>,
{
    let mut names = HashSet::new();
    let unique: Vec<&'a ChordVoicing> = catalog
        .into_iter()
        .filter(|chord| names.insert(chord.name.as_str()))
        .collect();

    let mut related: Vec<RelatedChord<'a>> = unique
        .iter()
        .filter(|chord| !is_same_chord(source, chord))
        .filter_map(|&chord| {
            let relationships = relationship_type(source, chord);
            let first = relationships.first()?;
            Some(RelatedChord {
                chord,
                score: score(source, chord, &relationships),
                primary_label: first.label.clone(),
                relationships,
            })
        })
        .collect();

    related.sort_by(|a, b| b.score.cmp(&a.score));
    let scored = related.len();

    if related.len() < max_results {
        for &chord in &unique {
            if chord.root != source.root || is_same_chord(source, chord) {
                continue;
            }
            if related.iter().any(|r| r.chord.id == chord.id) {
                continue;
            }
            related.push(RelatedChord {
                chord,
                relationships: vec![Relationship::new(RelationshipKind::SameRoot, "same root")],
                score: BACKFILL_SCORE,
                primary_label: "same root".to_string(),
            });
        }
    }

    related.truncate(max_results);
    debug!(
        source = %source.id,
        scored,
        returned = related.len(),
        "ranked related chords"
    );
    related
}

/// [`related_chords`] bound to a catalog and a result limit.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipEngine<'a> {
    catalog: &'a ChordCatalog,
    max_results: usize,
}

impl<'a> RelationshipEngine<'a> {
    pub fn new(catalog: &'a ChordCatalog) -> Self {
        Self {
            catalog,
            max_results: DEFAULT_MAX_RELATED,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn related(&self, source: &ChordVoicing) -> Vec<RelatedChord<'a>> {
        related_chords(source, self.catalog, self.max_results)
    }

    /// Look the source up by id or name first; `None` if it is not in the catalog.
    pub fn related_to(&self, id_or_name: &str) -> Option<Vec<RelatedChord<'a>>> {
        let source = self.catalog.find(id_or_name)?;
        Some(self.related(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;
    use pretty_assertions::assert_eq;

    fn chord(name: &str, root: Note, quality: ChordQuality, notes: &[Note], difficulty: u8) -> ChordVoicing {
        ChordVoicing {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.into(),
            root,
            quality,
            notes: notes.to_vec(),
            difficulty,
            moods: Vec::new(),
            styles: Vec::new(),
        }
    }

    fn c_major() -> ChordVoicing {
        chord("C", Note::C, ChordQuality::Major, &[Note::C, Note::E, Note::G], 1)
    }

    fn kinds(rels: &[Relationship]) -> Vec<RelationshipKind> {
        rels.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn fifth_above_major() {
        let g = chord("G", Note::G, ChordQuality::Major, &[Note::G, Note::B, Note::D], 1);
        let rels = relationship_type(&c_major(), &g);
        assert_eq!(
            rels,
            vec![
                Relationship::new(RelationshipKind::CircleOfFifths, "V chord"),
                Relationship::new(RelationshipKind::Diatonic, "same key"),
            ]
        );
        // 100 + 70 + major bonus + easy bonus
        assert_eq!(score(&c_major(), &g, &rels), 185);

        let hard_g = chord("G barre", Note::G, ChordQuality::Major, &[Note::G], 3);
        assert_eq!(score(&c_major(), &hard_g, &rels), 180);
    }

    #[test]
    fn fourth_above_major() {
        let f = chord("F", Note::F, ChordQuality::Major, &[Note::F, Note::A, Note::C], 3);
        let rels = relationship_type(&c_major(), &f);
        assert_eq!(rels[0], Relationship::new(RelationshipKind::CircleOfFifths, "IV chord"));
        assert_eq!(kinds(&rels), [RelationshipKind::CircleOfFifths, RelationshipKind::Diatonic]);
    }

    #[test]
    fn relative_major_of_minor() {
        let am = chord("Am", Note::A, ChordQuality::Minor, &[Note::A, Note::C, Note::E], 1);
        let c = c_major();
        let rels = relationship_type(&am, &c);
        assert_eq!(rels[0], Relationship::new(RelationshipKind::Relative, "relative"));
        assert_eq!(kinds(&rels), [RelationshipKind::Relative, RelationshipKind::Diatonic]);
        // 95 + 70 + major bonus + easy bonus
        assert_eq!(score(&am, &c, &rels), 180);

        let back = relationship_type(&c, &am);
        assert_eq!(kinds(&back), [RelationshipKind::Relative, RelationshipKind::Diatonic]);
    }

    #[test]
    fn two_five_motion() {
        let dm = chord("Dm", Note::D, ChordQuality::Minor, &[Note::D, Note::F, Note::A], 1);
        let a7 = chord(
            "A7",
            Note::A,
            ChordQuality::Dominant7,
            &[Note::A, Note::C_SHARP, Note::E, Note::G],
            2,
        );
        let rels = relationship_type(&dm, &a7);
        assert_eq!(
            kinds(&rels),
            [RelationshipKind::CircleOfFifths, RelationshipKind::Progression]
        );
        assert_eq!(rels[1].label, "V of ii-V");
        // no major/minor bonus for a dominant seventh
        assert_eq!(score(&dm, &a7, &rels), 100 + 85 + 5);
    }

    #[test]
    fn dominant_resolves_down_a_fifth() {
        let g7 = chord(
            "G7",
            Note::G,
            ChordQuality::Dominant7,
            &[Note::G, Note::B, Note::D, Note::F],
            2,
        );
        let rels = relationship_type(&g7, &c_major());
        assert_eq!(
            rels,
            vec![
                Relationship::new(RelationshipKind::CircleOfFifths, "IV chord"),
                Relationship::new(RelationshipKind::Resolution, "resolves to"),
            ]
        );
        assert_eq!(score(&g7, &c_major(), &rels), 100 + 90 + 10 + 5);
    }

    #[test]
    fn same_root_variants() {
        let cm = chord("Cm", Note::C, ChordQuality::Minor, &[Note::C, Note::D_SHARP, Note::G], 1);
        let rels = relationship_type(&c_major(), &cm);
        assert_eq!(rels, vec![Relationship::new(RelationshipKind::SameRoot, "minor variant")]);
        assert_eq!(score(&c_major(), &cm, &rels), 75 + 10 + 5);

        let c7 = chord("C7", Note::C, ChordQuality::Dominant7, &[Note::C], 2);
        assert_eq!(relationship_type(&c_major(), &c7)[0].label, "dominant 7th");

        let c9 = chord("Cadd9", Note::C, ChordQuality::Add9, &[Note::C], 2);
        assert_eq!(relationship_type(&c_major(), &c9)[0].label, "variant");
    }

    #[test]
    fn shared_notes_only_as_fallback() {
        let a7 = chord(
            "A7",
            Note::A,
            ChordQuality::Dominant7,
            &[Note::A, Note::C_SHARP, Note::E, Note::G],
            2,
        );
        let rels = relationship_type(&c_major(), &a7);
        assert_eq!(rels, vec![Relationship::new(RelationshipKind::SharedNotes, "2 shared notes")]);
        assert_eq!(score(&c_major(), &a7, &rels), 40 + 20 + 5);

        // E minor shares two notes with C but is already "same key".
        let em = chord("Em", Note::E, ChordQuality::Minor, &[Note::E, Note::G, Note::B], 1);
        assert_eq!(kinds(&relationship_type(&c_major(), &em)), [RelationshipKind::Diatonic]);
    }

    #[test]
    fn repeated_notes_do_not_count_as_shared() {
        let doubled = chord("F# odd", Note::F_SHARP, ChordQuality::Major, &[Note::F_SHARP, Note::G, Note::G], 1);
        assert!(relationship_type(&doubled, &c_major()).is_empty());
        assert!(relationship_type(&c_major(), &doubled).is_empty());
    }

    #[test]
    fn unrelated_chords() {
        let fsharp = chord("F#", Note::F_SHARP, ChordQuality::Major, &[Note::F_SHARP, Note::A_SHARP, Note::C_SHARP], 1);
        assert!(relationship_type(&c_major(), &fsharp).is_empty());
    }

    fn scenario_catalog() -> Vec<ChordVoicing> {
        vec![
            c_major(),
            chord("F#", Note::F_SHARP, ChordQuality::Major, &[Note::F_SHARP, Note::A_SHARP, Note::C_SHARP], 1),
            chord("Am", Note::A, ChordQuality::Minor, &[Note::A, Note::C, Note::E], 1),
            chord("C shell", Note::C, ChordQuality::Major, &[Note::C], 2),
            chord("G", Note::G, ChordQuality::Major, &[Note::G, Note::B, Note::D], 1),
            chord("C high", Note::C, ChordQuality::Major, &[Note::E], 3),
            chord("C shell", Note::C, ChordQuality::Major, &[Note::C, Note::G], 1),
        ]
    }

    #[test]
    fn backfill_appends_same_root_after_scored() {
        let catalog = scenario_catalog();
        let related = related_chords(&c_major(), &catalog, DEFAULT_MAX_RELATED);

        let summary: Vec<(&str, u32, &str)> = related
            .iter()
            .map(|r| (r.chord.name.as_str(), r.score, r.primary_label.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("G", 185, "V chord"),
                ("Am", 180, "relative"),
                ("C shell", 50, "same root"),
                ("C high", 50, "same root"),
            ]
        );
        assert!(related[2].has(RelationshipKind::SameRoot));
    }

    #[test]
    fn never_returns_source_and_respects_limit() {
        let catalog = scenario_catalog();
        let source = &catalog[0];
        for max in 0..8 {
            let related = related_chords(source, &catalog, max);
            assert!(related.len() <= max);
            assert!(related
                .iter()
                .all(|r| r.chord.id != source.id && r.chord.name != source.name));
        }
        assert_eq!(related_chords(source, &catalog, 1)[0].chord.name, "G");
    }

    #[test]
    fn source_excluded_by_name_when_another_voicing_is_kept() {
        let mut barre = chord("C", Note::C, ChordQuality::Major, &[Note::G, Note::C, Note::E], 3);
        barre.id = "c-barre".into();
        let catalog = vec![
            c_major(),
            chord("G", Note::G, ChordQuality::Major, &[Note::G, Note::B, Note::D], 1),
            chord("C shell", Note::C, ChordQuality::Major, &[Note::C], 2),
            barre.clone(),
        ];

        // "c" survives name collapsing and shares the root, but it is the same chord.
        let summary: Vec<(&str, u32)> = related_chords(&barre, &catalog, DEFAULT_MAX_RELATED)
            .iter()
            .map(|r| (r.chord.id.as_str(), r.score))
            .collect();
        assert_eq!(summary, vec![("g", 185), ("c-shell", 50)]);
    }

    #[test]
    fn equal_scores_keep_catalog_order() {
        let catalog = vec![
            c_major(),
            chord("Dm", Note::D, ChordQuality::Minor, &[Note::D, Note::F, Note::A], 1),
            chord("Em", Note::E, ChordQuality::Minor, &[Note::E, Note::G, Note::B], 1),
        ];
        let names: Vec<&str> = related_chords(&catalog[0], &catalog, 6)
            .iter()
            .map(|r| r.chord.name.as_str())
            .collect();
        assert_eq!(names, ["Dm", "Em"]);
    }

    #[test]
    fn engine_looks_up_source() {
        let catalog = ChordCatalog::from_voicings(vec![
            c_major(),
            chord("G", Note::G, ChordQuality::Major, &[Note::G, Note::B, Note::D], 1),
        ])
        .unwrap();
        let engine = RelationshipEngine::new(&catalog).with_max_results(3);

        let related = engine.related_to("c").unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].describe(), "G: V chord, same key (score 185)");
        assert!(engine.related_to("nope").is_none());
    }
}
