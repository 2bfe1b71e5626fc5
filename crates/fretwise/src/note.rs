//! Pitch-class arithmetic and enharmonic normalization.
//!
//! Every computation in the crate runs on [`Note`], a pitch class 0–11
//! spelled canonically with sharps. Flat spellings are accepted on input
//! and produced only on request for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownNote;

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const NOTE_NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Key roots conventionally spelled with flats (Db, Eb, F, Gb, Ab, Bb).
const FLAT_KEY_ROOTS: [u8; 6] = [1, 3, 5, 6, 8, 10];

/// A pitch class, C = 0 through B = 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note(u8);

impl Note {
    pub const C: Note = Note(0);
    pub const C_SHARP: Note = Note(1);
    pub const D: Note = Note(2);
    pub const D_SHARP: Note = Note(3);
    pub const E: Note = Note(4);
    pub const F: Note = Note(5);
    pub const F_SHARP: Note = Note(6);
    pub const G: Note = Note(7);
    pub const G_SHARP: Note = Note(8);
    pub const A: Note = Note(9);
    pub const A_SHARP: Note = Note(10);
    pub const B: Note = Note(11);

    /// All twelve pitch classes in chromatic order starting from C.
    pub const CHROMATIC: [Note; 12] = [
        Note(0),
        Note(1),
        Note(2),
        Note(3),
        Note(4),
        Note(5),
        Note(6),
        Note(7),
        Note(8),
        Note(9),
        Note(10),
        Note(11),
    ];

    /// Parse any recognized spelling ("Bb", "a#3", "E♭") into a pitch class.
    pub fn parse(name: &str) -> Option<Self> {
        pitch_class_of(name).map(Note)
    }

    pub fn pitch_class(self) -> u8 {
        self.0
    }

    /// Canonical sharp spelling.
    pub fn name(self) -> &'static str {
        NOTE_NAMES_SHARP[self.0 as usize]
    }

    pub fn display_name(self, use_flats: bool) -> &'static str {
        if use_flats {
            NOTE_NAMES_FLAT[self.0 as usize]
        } else {
            NOTE_NAMES_SHARP[self.0 as usize]
        }
    }

    /// Whether a key rooted on this note is normally written with flats.
    pub fn prefers_flats(self) -> bool {
        FLAT_KEY_ROOTS.contains(&self.0)
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Note((self.0 as i32 + semitones).rem_euclid(12) as u8)
    }

    /// Upward distance from `self` to `other`, 0–11.
    pub fn distance_to(self, other: Note) -> u8 {
        (other.0 + 12 - self.0) % 12
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Note {
    type Err = UnknownNote;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s).ok_or_else(|| UnknownNote(s.to_string()))
    }
}

impl TryFrom<String> for Note {
    type Error = UnknownNote;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.name().to_string()
    }
}

/// Letter + optional single accidental, with any trailing octave number removed.
fn pitch_class_of(note: &str) -> Option<u8> {
    let trimmed = note.trim().trim_end_matches(|c: char| c.is_ascii_digit());
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);

    let mut chars = trimmed.chars();
    let base: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let accidental = match chars.as_str() {
        "" => 0,
        "#" | "♯" => 1,
        "b" | "♭" => -1,
        _ => return None,
    };

    Some((base + accidental).rem_euclid(12) as u8)
}

/// Canonical sharp spelling of `note`, or `None` if it is not a pitch name.
pub fn normalize_note(note: &str) -> Option<&'static str> {
    Note::parse(note).map(Note::name)
}

/// The pitch class `semitones` above `root`, wrapping mod 12.
pub fn note_at_interval(root: &str, semitones: i32) -> Option<Note> {
    Note::parse(root).map(|r| r.transpose(semitones))
}

/// Upward distance in semitones from `a` to `b`, 0–11.
pub fn semitone_distance(a: Note, b: Note) -> u8 {
    a.distance_to(b)
}

/// [`semitone_distance`] over raw spellings; `None` if either is unrecognized.
pub fn semitone_distance_str(a: &str, b: &str) -> Option<u8> {
    Some(semitone_distance(Note::parse(a)?, Note::parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flats_map_to_sharps() {
        assert_eq!(normalize_note("Db"), Some("C#"));
        assert_eq!(normalize_note("Eb"), Some("D#"));
        assert_eq!(normalize_note("Gb"), Some("F#"));
        assert_eq!(normalize_note("Ab"), Some("G#"));
        assert_eq!(normalize_note("Bb"), Some("A#"));
    }

    #[test]
    fn octave_markers_stripped() {
        assert_eq!(normalize_note("E2"), Some("E"));
        assert_eq!(normalize_note("Bb3"), Some("A#"));
        assert_eq!(normalize_note("C-1"), Some("C"));
        assert_eq!(normalize_note(" g#4 "), Some("G#"));
    }

    #[test]
    fn unicode_accidentals() {
        assert_eq!(normalize_note("E♭"), Some("D#"));
        assert_eq!(normalize_note("F♯"), Some("F#"));
    }

    #[test]
    fn edge_spellings_wrap() {
        assert_eq!(normalize_note("Cb"), Some("B"));
        assert_eq!(normalize_note("E#"), Some("F"));
        assert_eq!(normalize_note("B#"), Some("C"));
    }

    #[test]
    fn unrecognized_names() {
        assert_eq!(normalize_note(""), None);
        assert_eq!(normalize_note("H"), None);
        assert_eq!(normalize_note("C##"), None);
        assert_eq!(normalize_note("Dbb"), None);
        assert_eq!(normalize_note("major"), None);
    }

    #[test]
    fn normalize_is_idempotent() {
        let spellings = [
            "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#",
            "Bb", "B", "c", "bb", "E4", "Cb", "E#",
        ];
        for s in spellings {
            let once = normalize_note(s).unwrap();
            assert_eq!(normalize_note(once), Some(once), "not idempotent for {s}");
        }
    }

    #[test]
    fn interval_wraps_mod_12() {
        assert_eq!(note_at_interval("C", 7), Some(Note::G));
        assert_eq!(note_at_interval("A", 3), Some(Note::C));
        assert_eq!(note_at_interval("Bb", 2), Some(Note::C));
        assert_eq!(note_at_interval("C", -1), Some(Note::B));
        assert_eq!(note_at_interval("C", 24), Some(Note::C));
        assert_eq!(note_at_interval("X", 2), None);
    }

    #[test]
    fn distance_contract() {
        for a in Note::CHROMATIC {
            for b in Note::CHROMATIC {
                let there = semitone_distance(a, b);
                let back = semitone_distance(b, a);
                assert!(there < 12);
                if a == b {
                    assert_eq!(there, 0);
                } else {
                    assert_eq!(there + back, 12, "{a} -> {b}");
                }
            }
        }
    }

    #[test]
    fn distance_from_spellings() {
        assert_eq!(semitone_distance_str("C", "G"), Some(7));
        assert_eq!(semitone_distance_str("G", "C"), Some(5));
        assert_eq!(semitone_distance_str("Db", "C#"), Some(0));
        assert_eq!(semitone_distance_str("C", "Q"), None);
    }

    #[test]
    fn flat_display() {
        assert_eq!(Note::A_SHARP.display_name(true), "Bb");
        assert_eq!(Note::A_SHARP.display_name(false), "A#");
        assert!(Note::F.prefers_flats());
        assert!(!Note::G.prefers_flats());
    }

    #[test]
    fn serde_uses_canonical_name() {
        let note: Note = serde_json::from_str("\"Eb\"").unwrap();
        assert_eq!(note, Note::D_SHARP);
        assert_eq!(serde_json::to_string(&note).unwrap(), "\"D#\"");
        assert!(serde_json::from_str::<Note>("\"Z\"").is_err());
    }
}
