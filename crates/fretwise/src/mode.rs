//! Mode definitions: interval pattern plus per-degree chord qualities and
//! roman numerals.
//!
//! A [`ModeTable`] is built once (standard church modes plus the two
//! common minor variants, optionally extended from config) and passed by
//! reference to the engines. Nothing here is global or mutable after load.

use serde::{Deserialize, Serialize};

use crate::error::ModeError;
use crate::quality::ChordQuality;

use crate::quality::ChordQuality::{
    Augmented as AUG, AugmentedMajor7 as MAJ7_SHARP5, Diminished as DIM, Diminished7 as DIM7,
    Dominant7 as DOM7, HalfDiminished7 as M7B5, Major as MAJ, Major7 as MAJ7, Minor as MIN,
    Minor7 as MIN7, MinorMajor7 as MMAJ7,
};

/// One mode: seven ascending intervals from the root and, for each degree,
/// the triad quality, seventh-chord quality and roman numeral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeDefinition {
    id: String,
    name: String,
    intervals: [u8; 7],
    triads: [ChordQuality; 7],
    sevenths: [ChordQuality; 7],
    numerals: [String; 7],
}

/// Mode as written in a tables file, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub intervals: Vec<u8>,
    pub triads: Vec<String>,
    pub sevenths: Vec<String>,
    pub numerals: Vec<String>,
}

impl ModeDefinition {
    /// Build a mode, checking that the intervals start at 0, strictly
    /// increase, stay within an octave, and that every sequence has 7 entries.
    pub fn new(
        id: &str,
        name: &str,
        intervals: &[u8],
        triads: &[ChordQuality],
        sevenths: &[ChordQuality],
        numerals: &[&str],
    ) -> Result<Self, ModeError> {
        let id = id.trim().to_lowercase();
        if id.is_empty() {
            return Err(ModeError::EmptyId);
        }

        let intervals = seven(&id, "intervals", intervals)?;
        let triads = seven(&id, "triads", triads)?;
        let sevenths = seven(&id, "sevenths", sevenths)?;
        let numerals: [&str; 7] = seven(&id, "numerals", numerals)?;

        if intervals[0] != 0 {
            return Err(ModeError::NonZeroRoot {
                id,
                first: intervals[0],
            });
        }
        for (i, &value) in intervals.iter().enumerate() {
            if value > 11 {
                return Err(ModeError::IntervalOutOfRange {
                    id,
                    degree: i + 1,
                    value,
                });
            }
            if i > 0 && value <= intervals[i - 1] {
                return Err(ModeError::NotAscending { id, degree: i + 1 });
            }
        }

        Ok(Self {
            name: name.to_string(),
            intervals,
            triads,
            sevenths,
            numerals: numerals.map(str::to_string),
            id,
        })
    }

    /// Validate a [`ModeSpec`] read from config.
    pub fn from_spec(id: &str, spec: &ModeSpec) -> Result<Self, ModeError> {
        let parse_all = |names: &[String]| -> Result<Vec<ChordQuality>, ModeError> {
            names
                .iter()
                .map(|n| {
                    n.parse::<ChordQuality>().map_err(|source| ModeError::Quality {
                        id: id.to_string(),
                        source,
                    })
                })
                .collect()
        };
        let triads = parse_all(&spec.triads)?;
        let sevenths = parse_all(&spec.sevenths)?;
        let numerals: Vec<&str> = spec.numerals.iter().map(String::as_str).collect();
        let name = spec.name.clone().unwrap_or_else(|| id.to_string());

        Self::new(id, &name, &spec.intervals, &triads, &sevenths, &numerals)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intervals(&self) -> &[u8; 7] {
        &self.intervals
    }

    pub fn triads(&self) -> &[ChordQuality; 7] {
        &self.triads
    }

    pub fn sevenths(&self) -> &[ChordQuality; 7] {
        &self.sevenths
    }

    pub fn numerals(&self) -> &[String; 7] {
        &self.numerals
    }
}

fn seven<T: Copy>(id: &str, field: &'static str, values: &[T]) -> Result<[T; 7], ModeError> {
    values.try_into().map_err(|_| ModeError::WrongLength {
        id: id.to_string(),
        field,
        len: values.len(),
    })
}

/// All known modes, looked up case-insensitively by id or alias.
#[derive(Debug, Clone)]
pub struct ModeTable {
    modes: Vec<ModeDefinition>,
    aliases: Vec<(String, String)>,
}

impl ModeTable {
    /// The seven church modes plus harmonic and melodic minor.
    /// `major` and `minor` alias ionian and aeolian.
    pub fn standard() -> Self {
        let modes = vec![
            builtin(
                "ionian",
                "Ionian (major)",
                [0, 2, 4, 5, 7, 9, 11],
                [MAJ, MIN, MIN, MAJ, MAJ, MIN, DIM],
                [MAJ7, MIN7, MIN7, MAJ7, DOM7, MIN7, M7B5],
                ["I", "ii", "iii", "IV", "V", "vi", "vii°"],
            ),
            builtin(
                "dorian",
                "Dorian",
                [0, 2, 3, 5, 7, 9, 10],
                [MIN, MIN, MAJ, MAJ, MIN, DIM, MAJ],
                [MIN7, MIN7, MAJ7, DOM7, MIN7, M7B5, MAJ7],
                ["i", "ii", "III", "IV", "v", "vi°", "VII"],
            ),
            builtin(
                "phrygian",
                "Phrygian",
                [0, 1, 3, 5, 7, 8, 10],
                [MIN, MAJ, MAJ, MIN, DIM, MAJ, MIN],
                [MIN7, MAJ7, DOM7, MIN7, M7B5, MAJ7, MIN7],
                ["i", "II", "III", "iv", "v°", "VI", "vii"],
            ),
            builtin(
                "lydian",
                "Lydian",
                [0, 2, 4, 6, 7, 9, 11],
                [MAJ, MAJ, MIN, DIM, MAJ, MIN, MIN],
                [MAJ7, DOM7, MIN7, M7B5, MAJ7, MIN7, MIN7],
                ["I", "II", "iii", "iv°", "V", "vi", "vii"],
            ),
            builtin(
                "mixolydian",
                "Mixolydian",
                [0, 2, 4, 5, 7, 9, 10],
                [MAJ, MIN, DIM, MAJ, MIN, MIN, MAJ],
                [DOM7, MIN7, M7B5, MAJ7, MIN7, MIN7, MAJ7],
                ["I", "ii", "iii°", "IV", "v", "vi", "VII"],
            ),
            builtin(
                "aeolian",
                "Aeolian (natural minor)",
                [0, 2, 3, 5, 7, 8, 10],
                [MIN, DIM, MAJ, MIN, MIN, MAJ, MAJ],
                [MIN7, M7B5, MAJ7, MIN7, MIN7, MAJ7, DOM7],
                ["i", "ii°", "III", "iv", "v", "VI", "VII"],
            ),
            builtin(
                "locrian",
                "Locrian",
                [0, 1, 3, 5, 6, 8, 10],
                [DIM, MAJ, MIN, MIN, MAJ, MAJ, MIN],
                [M7B5, MAJ7, MIN7, MIN7, MAJ7, DOM7, MIN7],
                ["i°", "II", "iii", "iv", "V", "VI", "vii"],
            ),
            builtin(
                "harmonic-minor",
                "Harmonic minor",
                [0, 2, 3, 5, 7, 8, 11],
                [MIN, DIM, AUG, MIN, MAJ, MAJ, DIM],
                [MMAJ7, M7B5, MAJ7_SHARP5, MIN7, DOM7, MAJ7, DIM7],
                ["i", "ii°", "III+", "iv", "V", "VI", "vii°"],
            ),
            builtin(
                "melodic-minor",
                "Melodic minor",
                [0, 2, 3, 5, 7, 9, 11],
                [MIN, MIN, AUG, MAJ, MAJ, DIM, DIM],
                [MMAJ7, MIN7, MAJ7_SHARP5, DOM7, DOM7, M7B5, M7B5],
                ["i", "ii", "III+", "IV", "V", "vi°", "vii°"],
            ),
        ];

        Self {
            modes,
            aliases: vec![
                ("major".to_string(), "ionian".to_string()),
                ("minor".to_string(), "aeolian".to_string()),
                ("natural-minor".to_string(), "aeolian".to_string()),
            ],
        }
    }

    /// Add a mode, replacing any existing mode with the same id.
    pub fn insert(&mut self, mode: ModeDefinition) {
        match self.modes.iter_mut().find(|m| m.id == mode.id) {
            Some(existing) => *existing = mode,
            None => self.modes.push(mode),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ModeDefinition> {
        let id = id.trim().to_lowercase();
        let target = self
            .aliases
            .iter()
            .find(|(alias, _)| *alias == id)
            .map(|(_, target)| target.as_str())
            .unwrap_or(&id);
        self.modes.iter().find(|m| m.id == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModeDefinition> {
        self.modes.iter()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl Default for ModeTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn builtin(
    id: &str,
    name: &str,
    intervals: [u8; 7],
    triads: [ChordQuality; 7],
    sevenths: [ChordQuality; 7],
    numerals: [&str; 7],
) -> ModeDefinition {
    ModeDefinition {
        id: id.to_string(),
        name: name.to_string(),
        intervals,
        triads,
        sevenths,
        numerals: numerals.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_modes_pass_validation() {
        for mode in ModeTable::standard().iter() {
            let numerals: Vec<&str> = mode.numerals().iter().map(String::as_str).collect();
            let rebuilt = ModeDefinition::new(
                mode.id(),
                mode.name(),
                mode.intervals(),
                mode.triads(),
                mode.sevenths(),
                &numerals,
            );
            assert_eq!(rebuilt.as_ref(), Ok(mode));
        }
    }

    #[test]
    fn aliases_and_case() {
        let table = ModeTable::standard();
        assert_eq!(table.get("major").map(|m| m.id()), Some("ionian"));
        assert_eq!(table.get("Minor").map(|m| m.id()), Some("aeolian"));
        assert_eq!(table.get(" DORIAN ").map(|m| m.id()), Some("dorian"));
        assert!(table.get("bebop").is_none());
    }

    #[test]
    fn rejects_bad_intervals() {
        let q = [MAJ; 7];
        let n = ["I"; 7];
        assert_eq!(
            ModeDefinition::new("x", "x", &[1, 2, 3, 4, 5, 6, 7], &q, &q, &n),
            Err(ModeError::NonZeroRoot {
                id: "x".into(),
                first: 1
            })
        );
        assert_eq!(
            ModeDefinition::new("x", "x", &[0, 2, 2, 5, 7, 9, 11], &q, &q, &n),
            Err(ModeError::NotAscending {
                id: "x".into(),
                degree: 3
            })
        );
        assert_eq!(
            ModeDefinition::new("x", "x", &[0, 2, 4, 5, 7, 9, 12], &q, &q, &n),
            Err(ModeError::IntervalOutOfRange {
                id: "x".into(),
                degree: 7,
                value: 12
            })
        );
        assert_eq!(
            ModeDefinition::new("x", "x", &[0, 2, 4, 5, 7, 9], &q, &q, &n),
            Err(ModeError::WrongLength {
                id: "x".into(),
                field: "intervals",
                len: 6
            })
        );
        assert_eq!(
            ModeDefinition::new("  ", "x", &[0, 2, 4, 5, 7, 9, 11], &q, &q, &n),
            Err(ModeError::EmptyId)
        );
    }

    #[test]
    fn spec_parses_quality_aliases() {
        let spec = ModeSpec {
            name: Some("Hirajoshi-ish".into()),
            intervals: vec![0, 2, 3, 5, 7, 8, 10],
            triads: ["min", "dim", "maj", "min", "min", "maj", "maj"]
                .map(String::from)
                .to_vec(),
            sevenths: ["m7", "m7b5", "maj7", "m7", "m7", "maj7", "7"]
                .map(String::from)
                .to_vec(),
            numerals: ["i", "ii°", "III", "iv", "v", "VI", "VII"]
                .map(String::from)
                .to_vec(),
        };
        let mode = ModeDefinition::from_spec("Custom", &spec).unwrap();
        assert_eq!(mode.id(), "custom");
        assert_eq!(mode.sevenths()[6], DOM7);

        let mut table = ModeTable::standard();
        let before = table.len();
        table.insert(mode);
        assert_eq!(table.len(), before + 1);
        assert!(table.get("CUSTOM").is_some());
    }

    #[test]
    fn spec_rejects_unknown_quality() {
        let spec = ModeSpec {
            name: None,
            intervals: vec![0, 2, 4, 5, 7, 9, 11],
            triads: vec!["weird".into(); 7],
            sevenths: vec!["7".into(); 7],
            numerals: vec!["I".into(); 7],
        };
        assert!(matches!(
            ModeDefinition::from_spec("odd", &spec),
            Err(ModeError::Quality { .. })
        ));
    }
}
