//! Plain-text rendering of query results.

use fretwise::{ChordVoicing, DiatonicSlot, Note, RelatedChord, ResolvedProgression, TheoryMatch};

/// Whether a key, as typed, should be displayed with flats.
pub fn wants_flats(key: &str) -> bool {
    !key.contains(['#', '♯']) && Note::parse(key).is_some_and(Note::prefers_flats)
}

pub fn scale_line(notes: &[Note], use_flats: bool) -> String {
    notes
        .iter()
        .map(|n| n.display_name(use_flats))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn slot_line(slot: &DiatonicSlot, use_flats: bool) -> String {
    format!(
        "{:<5} {:<7} {}",
        slot.numeral,
        slot.symbol(false, use_flats),
        slot.symbol(true, use_flats)
    )
}

pub fn voicing_line(chord: &ChordVoicing) -> String {
    let notes: Vec<&str> = chord.notes.iter().map(|n| n.name()).collect();
    format!(
        "{:<16} {:<8} difficulty {}  [{}]",
        chord.id,
        chord.name,
        chord.difficulty,
        notes.join(" ")
    )
}

pub fn theory_line(found: &TheoryMatch<'_>) -> String {
    let marker = if found.diatonic.is_seventh_chord { "  (7th)" } else { "" };
    format!("{:<5} {}{}", found.diatonic.numeral, voicing_line(found.chord), marker)
}

pub fn related_line(rank: usize, related: &RelatedChord<'_>) -> String {
    format!("{rank:>2}. {}", related.describe())
}

pub fn progression_line(progression: &ResolvedProgression, use_flats: bool) -> String {
    let symbols: Vec<String> = progression.steps.iter().map(|s| s.symbol(use_flats)).collect();
    format!("{}: {}", progression.name, symbols.join(" - "))
}
