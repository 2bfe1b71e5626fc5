//! Scale and diatonic-chord derivation for a key.

use serde::Serialize;
use tracing::{debug, warn};

use crate::mode::ModeTable;
use crate::note::{note_at_interval, Note};
use crate::quality::ChordQuality;

/// One scale degree of a key: its root and the chords built on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiatonicSlot {
    pub root: Note,
    pub triad: ChordQuality,
    pub seventh: ChordQuality,
    pub numeral: String,
    /// 1–7
    pub degree: u8,
}

impl DiatonicSlot {
    /// Chord symbol for the triad (or seventh) on this degree: "Dm", "G7".
    pub fn symbol(&self, seventh: bool, use_flats: bool) -> String {
        let quality = if seventh { self.seventh } else { self.triad };
        format!("{}{}", self.root.display_name(use_flats), quality.suffix())
    }
}

/// A roman numeral from a progression template, resolved in a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressionStep {
    /// The numeral as written in the template.
    pub numeral: String,
    pub slot: DiatonicSlot,
    /// The template asked for the seventh chord ("V7").
    pub seventh: bool,
}

impl ProgressionStep {
    pub fn quality(&self) -> ChordQuality {
        if self.seventh {
            self.slot.seventh
        } else {
            self.slot.triad
        }
    }

    pub fn symbol(&self, use_flats: bool) -> String {
        self.slot.symbol(self.seventh, use_flats)
    }
}

/// Derives scale notes and diatonic chords from a [`ModeTable`].
#[derive(Debug, Clone, Copy)]
pub struct ScaleEngine<'a> {
    modes: &'a ModeTable,
}

impl<'a> ScaleEngine<'a> {
    pub fn new(modes: &'a ModeTable) -> Self {
        Self { modes }
    }

    pub fn modes(&self) -> &'a ModeTable {
        self.modes
    }

    /// The seven notes of `root` in `mode_id`, in degree order.
    ///
    /// Empty when the mode or root is unknown.
    pub fn scale_notes(&self, root: &str, mode_id: &str) -> Vec<Note> {
        let Some(mode) = self.modes.get(mode_id) else {
            warn!(mode = mode_id, "unknown mode");
            return Vec::new();
        };

        mode.intervals()
            .iter()
            .map(|&interval| note_at_interval(root, interval as i32))
            .collect::<Option<Vec<_>>>()
            .unwrap_or_else(|| {
                warn!(root, "unrecognized key root");
                Vec::new()
            })
    }

    /// The seven diatonic chord slots of `root` in `mode_id`.
    ///
    /// Slot `i` is rooted on `scale_notes(root, mode_id)[i]`.
    pub fn diatonic_chords(&self, root: &str, mode_id: &str) -> Vec<DiatonicSlot> {
        let Some(mode) = self.modes.get(mode_id) else {
            warn!(mode = mode_id, "unknown mode");
            return Vec::new();
        };

        let notes = self.scale_notes(root, mode_id);
        let slots: Vec<DiatonicSlot> = notes
            .into_iter()
            .enumerate()
            .map(|(i, note)| DiatonicSlot {
                root: note,
                triad: mode.triads()[i],
                seventh: mode.sevenths()[i],
                numeral: mode.numerals()[i].clone(),
                degree: (i + 1) as u8,
            })
            .collect();

        debug!(root, mode = mode.id(), slots = slots.len(), "derived diatonic chords");
        slots
    }

    /// Resolve one roman numeral ("IV", "vii°", "V7") in a key.
    pub fn resolve_numeral(&self, root: &str, mode_id: &str, numeral: &str) -> Option<ProgressionStep> {
        let (degree, seventh) = parse_numeral(numeral)?;
        let slot = self
            .diatonic_chords(root, mode_id)
            .into_iter()
            .nth(degree as usize - 1)?;

        Some(ProgressionStep {
            numeral: numeral.to_string(),
            slot,
            seventh,
        })
    }

    /// Resolve every numeral of a progression template, skipping the ones
    /// that do not parse.
    pub fn resolve_progression<S: AsRef<str>>(
        &self,
        root: &str,
        mode_id: &str,
        numerals: &[S],
    ) -> Vec<ProgressionStep> {
        let slots = self.diatonic_chords(root, mode_id);
        if slots.is_empty() {
            return Vec::new();
        }

        numerals
            .iter()
            .filter_map(|numeral| {
                let numeral = numeral.as_ref();
                let Some((degree, seventh)) = parse_numeral(numeral) else {
                    warn!(numeral, "skipping unparseable roman numeral");
                    return None;
                };
                Some(ProgressionStep {
                    numeral: numeral.to_string(),
                    slot: slots[degree as usize - 1].clone(),
                    seventh,
                })
            })
            .collect()
    }
}

/// Parse a roman numeral into `(degree 1–7, wants_seventh)`.
///
/// Case and quality decorations (°, o, +, ø) are ignored; the degree alone
/// picks the slot, and the key's mode decides the quality. A trailing `7`
/// selects the seventh chord.
pub fn parse_numeral(numeral: &str) -> Option<(u8, bool)> {
    let trimmed = numeral.trim();
    let (body, seventh) = match trimmed.strip_suffix('7') {
        Some(body) => (body, true),
        None => (trimmed, false),
    };
    let body = body.trim_end_matches(['°', 'o', '+', 'ø']);

    let degree = match body.to_ascii_uppercase().as_str() {
        "I" => 1,
        "II" => 2,
        "III" => 3,
        "IV" => 4,
        "V" => 5,
        "VI" => 6,
        "VII" => 7,
        _ => return None,
    };
    Some((degree, seventh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn c_ionian_diatonic_chords() {
        let modes = ModeTable::standard();
        let engine = ScaleEngine::new(&modes);
        let slots = engine.diatonic_chords("C", "ionian");

        let roots: Vec<&str> = slots.iter().map(|s| s.root.name()).collect();
        assert_eq!(roots, ["C", "D", "E", "F", "G", "A", "B"]);

        let triads: Vec<ChordQuality> = slots.iter().map(|s| s.triad).collect();
        assert_eq!(
            triads,
            [
                ChordQuality::Major,
                ChordQuality::Minor,
                ChordQuality::Minor,
                ChordQuality::Major,
                ChordQuality::Major,
                ChordQuality::Minor,
                ChordQuality::Diminished,
            ]
        );

        let numerals: Vec<&str> = slots.iter().map(|s| s.numeral.as_str()).collect();
        assert_eq!(numerals, ["I", "ii", "iii", "IV", "V", "vi", "vii°"]);
        assert_eq!(slots[4].seventh, ChordQuality::Dominant7);
    }

    #[test]
    fn every_mode_yields_seven_ordered_slots() {
        let modes = ModeTable::standard();
        let engine = ScaleEngine::new(&modes);
        for root in ["C", "F#", "Bb", "g"] {
            for mode in modes.iter() {
                let notes = engine.scale_notes(root, mode.id());
                let slots = engine.diatonic_chords(root, mode.id());
                assert_eq!(slots.len(), 7, "{root} {}", mode.id());
                for (i, slot) in slots.iter().enumerate() {
                    assert_eq!(slot.degree as usize, i + 1);
                    assert_eq!(slot.root, notes[i]);
                }
            }
        }
    }

    #[test]
    fn enharmonic_root() {
        let modes = ModeTable::standard();
        let engine = ScaleEngine::new(&modes);
        assert_eq!(
            engine.scale_notes("Eb", "major"),
            engine.scale_notes("D#", "ionian")
        );
        let names: Vec<&str> = engine
            .scale_notes("A", "minor")
            .iter()
            .map(|n| n.name())
            .collect();
        assert_eq!(names, ["A", "B", "C", "D", "E", "F", "G"]);
    }

    #[test]
    fn unknown_mode_or_root_is_empty() {
        let modes = ModeTable::standard();
        let engine = ScaleEngine::new(&modes);
        assert!(engine.scale_notes("C", "bebop").is_empty());
        assert!(engine.diatonic_chords("C", "bebop").is_empty());
        assert!(engine.scale_notes("H", "ionian").is_empty());
        assert!(engine.diatonic_chords("H", "ionian").is_empty());
    }

    #[test]
    fn numeral_parsing() {
        assert_eq!(parse_numeral("I"), Some((1, false)));
        assert_eq!(parse_numeral("vi"), Some((6, false)));
        assert_eq!(parse_numeral("vii°"), Some((7, false)));
        assert_eq!(parse_numeral("viio7"), Some((7, true)));
        assert_eq!(parse_numeral("V7"), Some((5, true)));
        assert_eq!(parse_numeral("III+"), Some((3, false)));
        assert_eq!(parse_numeral("bVII"), None);
        assert_eq!(parse_numeral("VIII"), None);
        assert_eq!(parse_numeral(""), None);
    }

    #[test]
    fn progression_in_key() {
        let modes = ModeTable::standard();
        let engine = ScaleEngine::new(&modes);
        let steps = engine.resolve_progression("G", "major", &["I", "V", "vi", "IV"]);
        let symbols: Vec<String> = steps.iter().map(|s| s.symbol(false)).collect();
        assert_eq!(symbols, ["G", "D", "Em", "C"]);

        let jazz = engine.resolve_progression("C", "major", &["ii7", "V7", "I7"]);
        let symbols: Vec<String> = jazz.iter().map(|s| s.symbol(false)).collect();
        assert_eq!(symbols, ["Dm7", "G7", "Cmaj7"]);
    }

    #[test]
    fn progression_skips_bad_numerals() {
        let modes = ModeTable::standard();
        let engine = ScaleEngine::new(&modes);
        let steps = engine.resolve_progression("A", "minor", &["i", "bII", "iv", "V"]);
        let symbols: Vec<String> = steps.iter().map(|s| s.symbol(false)).collect();
        // Aeolian's fifth degree is minor.
        assert_eq!(symbols, ["Am", "Dm", "Em"]);
    }

    #[test]
    fn single_numeral_with_flats() {
        let modes = ModeTable::standard();
        let engine = ScaleEngine::new(&modes);
        let step = engine.resolve_numeral("F", "ionian", "IV").unwrap();
        assert_eq!(step.symbol(true), "Bb");
        assert_eq!(step.quality(), ChordQuality::Major);
        assert!(engine.resolve_numeral("F", "ionian", "X").is_none());
    }
}
