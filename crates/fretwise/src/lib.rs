//! Guitar chord theory core.
//!
//! Maps keys, modes, moods and styles onto concrete chord voicings, and
//! explains how chords relate to one another.
//!
//! - [`note`]: pitch-class arithmetic and enharmonic normalization
//! - [`quality`]: chord qualities and their alias table
//! - [`mode`]: mode definitions and the [`ModeTable`]
//! - [`scale`]: scale notes, diatonic chord slots, roman-numeral progressions
//! - [`catalog`]: validated chord voicings
//! - [`tables`]: mood and style profiles
//! - [`selection`]: picking voicings by mood, style or key; filtering and sorting
//! - [`relationships`]: ranking related chords
//!
//! All queries are pure functions over borrowed, immutable tables. Unknown
//! notes, modes, moods or styles give empty results, never errors; only
//! loading a catalog or a mode definition can fail.
//!
//! # Example
//!
//! ```
//! use fretwise::{ChordCatalog, RelationshipEngine, ScaleEngine, ModeTable};
//!
//! let modes = ModeTable::standard();
//! let slots = ScaleEngine::new(&modes).diatonic_chords("G", "major");
//! assert_eq!(slots[4].symbol(true, false), "D7");
//!
//! let catalog = ChordCatalog::from_json(r#"[
//!     {"id": "c", "name": "C", "root": "C", "quality": "major",
//!      "notes": ["C", "E", "G"], "difficulty": 1},
//!     {"id": "g", "name": "G", "root": "G", "quality": "major",
//!      "notes": ["G", "B", "D"], "difficulty": 1}
//! ]"#).unwrap();
//! let related = RelationshipEngine::new(&catalog).related_to("c").unwrap();
//! assert_eq!(related[0].primary_label, "V chord");
//! ```

pub mod catalog;
pub mod error;
pub mod mode;
pub mod note;
pub mod quality;
pub mod relationships;
pub mod scale;
pub mod selection;
pub mod tables;

pub use catalog::{ChordCatalog, ChordVoicing, RawVoicing};
pub use error::{CatalogError, ModeError, UnknownNote, UnknownQuality};
pub use mode::{ModeDefinition, ModeSpec, ModeTable};
pub use note::{normalize_note, note_at_interval, semitone_distance, Note};
pub use quality::ChordQuality;
pub use relationships::{
    related_chords, relationship_type, RelatedChord, Relationship, RelationshipEngine,
    RelationshipKind, DEFAULT_MAX_RELATED,
};
pub use scale::{DiatonicSlot, ProgressionStep, ScaleEngine};
pub use selection::{
    filter_by_difficulty, sort_chords, DiatonicInfo, HasVoicing, ResolvedProgression,
    SelectionEngine, TheoryMatch,
};
pub use tables::{ProfileTable, ProgressionTemplate, TagProfile, TheoryTables};
