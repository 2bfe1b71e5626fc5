//! Chord qualities and the alias table that decides which spellings are
//! the same quality.
//!
//! Catalog records, mode tables and mood/style tables all spell qualities
//! differently ("dominant7", "dom7", "7"). [`ChordQuality::parse`] is the
//! only path from a string to a quality, so two spellings are equivalent
//! exactly when they share a row in [`QUALITY_ALIASES`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownQuality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Dominant7,
    Major7,
    Minor7,
    MinorMajor7,
    Diminished7,
    HalfDiminished7,
    AugmentedMajor7,
    Major6,
    Minor6,
    Add9,
    Power,
}

/// Closed equivalence table. The first alias in each row is the canonical id.
pub static QUALITY_ALIASES: &[(ChordQuality, &[&str])] = &[
    (ChordQuality::Major, &["major", "maj", "M", ""]),
    (ChordQuality::Minor, &["minor", "min", "m", "-"]),
    (ChordQuality::Diminished, &["diminished", "dim", "°", "o"]),
    (ChordQuality::Augmented, &["augmented", "aug", "+"]),
    (ChordQuality::Sus2, &["sus2", "suspended2", "suspended-2"]),
    (ChordQuality::Sus4, &["sus4", "sus", "suspended4", "suspended-4"]),
    (ChordQuality::Dominant7, &["dominant7", "dom7", "7", "dominant"]),
    (ChordQuality::Major7, &["major7", "maj7", "M7", "Δ7", "Δ"]),
    (ChordQuality::Minor7, &["minor7", "min7", "m7", "-7"]),
    (
        ChordQuality::MinorMajor7,
        &["minor-major7", "minmaj7", "mMaj7", "m(maj7)"],
    ),
    (ChordQuality::Diminished7, &["diminished7", "dim7", "°7", "o7"]),
    (
        ChordQuality::HalfDiminished7,
        &["half-diminished", "half-diminished7", "m7b5", "min7b5", "ø", "ø7"],
    ),
    (
        ChordQuality::AugmentedMajor7,
        &["augmented-major7", "augmaj7", "maj7#5", "+maj7"],
    ),
    (ChordQuality::Major6, &["major6", "maj6", "6"]),
    (ChordQuality::Minor6, &["minor6", "min6", "m6"]),
    (ChordQuality::Add9, &["add9", "major-add9"]),
    (ChordQuality::Power, &["power", "5"]),
];

impl ChordQuality {
    /// Resolve any alias to its quality.
    ///
    /// Aliases are matched exactly first. Word aliases ("Major", "DOM7")
    /// also match case-insensitively; short symbols never do, since "M"
    /// and "m" are different chords.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let exact = QUALITY_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.contains(&name))
            .map(|(quality, _)| *quality);
        if exact.is_some() || name.chars().count() <= 2 {
            return exact;
        }

        let lowered = name.to_lowercase();
        QUALITY_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|alias| alias.to_lowercase() == lowered))
            .map(|(quality, _)| *quality)
    }

    /// Canonical id, as written in catalogs and config tables.
    pub fn id(self) -> &'static str {
        QUALITY_ALIASES
            .iter()
            .find(|(quality, _)| *quality == self)
            .and_then(|(_, aliases)| aliases.first().copied())
            .unwrap_or("major")
    }

    /// Suffix for chord symbol display
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::MinorMajor7 => "m(maj7)",
            ChordQuality::Diminished7 => "dim7",
            ChordQuality::HalfDiminished7 => "m7b5",
            ChordQuality::AugmentedMajor7 => "maj7#5",
            ChordQuality::Major6 => "6",
            ChordQuality::Minor6 => "m6",
            ChordQuality::Add9 => "add9",
            ChordQuality::Power => "5",
        }
    }

    /// How a chord of this quality is described next to another chord on
    /// the same root.
    pub fn variant_label(self) -> &'static str {
        match self {
            ChordQuality::Major => "major variant",
            ChordQuality::Minor => "minor variant",
            ChordQuality::Dominant7 => "dominant 7th",
            ChordQuality::Major7 => "major 7th",
            ChordQuality::Minor7 => "minor 7th",
            ChordQuality::Sus2 => "suspended 2nd",
            ChordQuality::Sus4 => "suspended 4th",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Augmented => "augmented",
            _ => "variant",
        }
    }

    pub fn is_seventh(self) -> bool {
        matches!(
            self,
            ChordQuality::Dominant7
                | ChordQuality::Major7
                | ChordQuality::Minor7
                | ChordQuality::MinorMajor7
                | ChordQuality::Diminished7
                | ChordQuality::HalfDiminished7
                | ChordQuality::AugmentedMajor7
        )
    }

    /// Plain major or minor triad.
    pub fn is_basic_triad(self) -> bool {
        matches!(self, ChordQuality::Major | ChordQuality::Minor)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChordQuality {
    type Err = UnknownQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordQuality::parse(s).ok_or_else(|| UnknownQuality(s.to_string()))
    }
}

impl TryFrom<String> for ChordQuality {
    type Error = UnknownQuality;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChordQuality> for String {
    fn from(quality: ChordQuality) -> Self {
        quality.id().to_string()
    }
}
