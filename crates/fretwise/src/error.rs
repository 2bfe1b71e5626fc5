use thiserror::Error;

/// A string that is not a recognized pitch name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized note name: {0:?}")]
pub struct UnknownNote(pub String);

/// A string that matches no entry in the chord-quality alias table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized chord quality: {0:?}")]
pub struct UnknownQuality(pub String);

/// Rejected mode definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("mode {id}: first interval must be 0, got {first}")]
    NonZeroRoot { id: String, first: u8 },

    #[error("mode {id}: interval {value} at degree {degree} is outside 0..=11")]
    IntervalOutOfRange { id: String, degree: usize, value: u8 },

    #[error("mode {id}: intervals must strictly increase (degree {degree})")]
    NotAscending { id: String, degree: usize },

    #[error("mode {id}: expected 7 {field}, got {len}")]
    WrongLength {
        id: String,
        field: &'static str,
        len: usize,
    },

    #[error("mode {id}: {source}")]
    Quality {
        id: String,
        #[source]
        source: UnknownQuality,
    },

    #[error("mode id must not be empty")]
    EmptyId,
}

/// Catalog load failures. Raised only while building a catalog; queries
/// against a loaded catalog never fail.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chord #{index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("chord {id}: {source}")]
    Note {
        id: String,
        #[source]
        source: UnknownNote,
    },

    #[error("chord {id}: {source}")]
    Quality {
        id: String,
        #[source]
        source: UnknownQuality,
    },

    #[error("chord {id}: voicing has no notes")]
    NoNotes { id: String },

    #[error("duplicate chord id: {0}")]
    DuplicateId(String),
}
