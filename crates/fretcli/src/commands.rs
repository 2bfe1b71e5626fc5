//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use fretconf::{ConfigSources, FretConfig};
use fretwise::{
    filter_by_difficulty, sort_chords, ChordCatalog, HasVoicing, Note, RelationshipEngine,
    ScaleEngine, SelectionEngine, TheoryTables,
};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use tracing::debug;

use crate::render;

/// Loaded configuration plus the options every subcommand shares.
pub struct Session {
    pub config: FretConfig,
    pub sources: ConfigSources,
}

/// Key, mode and spelling after applying config defaults.
pub struct KeyChoice {
    pub key: String,
    pub mode: String,
    pub use_flats: bool,
}

impl KeyChoice {
    fn check(&self, tables: &TheoryTables) -> Result<()> {
        if Note::parse(&self.key).is_none() {
            bail!("Unknown key {:?}", self.key);
        }
        if tables.modes.get(&self.mode).is_none() {
            bail!("Unknown mode {:?}", self.mode);
        }
        Ok(())
    }
}

impl Session {
    pub fn key_choice(&self, key: Option<String>, mode: Option<String>, flats: bool) -> KeyChoice {
        let key = key.unwrap_or_else(|| self.config.defaults.key.clone());
        let mode = mode.unwrap_or_else(|| self.config.defaults.mode.clone());
        let use_flats = flats || render::wants_flats(&key);
        KeyChoice { key, mode, use_flats }
    }

    fn tables(&self) -> Result<TheoryTables> {
        self.config.load_tables().context("Failed to load theory tables")
    }

    fn catalog(&self) -> Result<ChordCatalog> {
        self.config.load_catalog().context("Failed to load chord catalog")
    }

    fn narrow<T: HasVoicing>(&self, chords: Vec<T>, difficulty: Option<&str>, sort: Option<&str>) -> Vec<T> {
        let difficulty = difficulty.unwrap_or(self.config.defaults.difficulty.as_str());
        let sort = sort.unwrap_or(self.config.defaults.sort_by.as_str());
        debug!(difficulty, sort, "narrowing results");
        sort_chords(filter_by_difficulty(chords, difficulty), sort)
    }
}

fn color() -> bool {
    std::io::stdout().is_terminal()
}

fn heading(text: &str) {
    if color() {
        println!("{}", text.bright_cyan().bold());
    } else {
        println!("{text}");
    }
}

fn none_found() {
    let text = "no matching voicings";
    if color() {
        println!("{}", text.dimmed());
    } else {
        println!("{text}");
    }
}

pub fn scale(session: &Session, choice: &KeyChoice) -> Result<()> {
    let tables = session.tables()?;
    choice.check(&tables)?;
    let notes = ScaleEngine::new(&tables.modes).scale_notes(&choice.key, &choice.mode);
    println!("{}", render::scale_line(&notes, choice.use_flats));
    Ok(())
}

pub fn chords(session: &Session, choice: &KeyChoice) -> Result<()> {
    let tables = session.tables()?;
    choice.check(&tables)?;
    let slots = ScaleEngine::new(&tables.modes).diatonic_chords(&choice.key, &choice.mode);
    heading(&format!("{} {}", choice.key, choice.mode));
    for slot in &slots {
        println!("{}", render::slot_line(slot, choice.use_flats));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Mood,
    Style,
}

impl ProfileKind {
    fn label(self) -> &'static str {
        match self {
            ProfileKind::Mood => "mood",
            ProfileKind::Style => "style",
        }
    }
}

pub fn profile(
    session: &Session,
    kind: ProfileKind,
    id: &str,
    difficulty: Option<&str>,
    sort: Option<&str>,
) -> Result<()> {
    let tables = session.tables()?;
    let profiles = match kind {
        ProfileKind::Mood => &tables.moods,
        ProfileKind::Style => &tables.styles,
    };
    let Some(profile) = profiles.get(id) else {
        let known: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        bail!("Unknown {} {id:?} (known: {})", kind.label(), known.join(", "));
    };

    let catalog = session.catalog()?;
    let engine = SelectionEngine::new(&catalog, &tables);
    let found = match kind {
        ProfileKind::Mood => engine.chords_by_mood(id),
        ProfileKind::Style => engine.chords_by_style(id),
    };
    let found = session.narrow(found, difficulty, sort);

    heading(&profile.name);
    if !profile.description.is_empty() {
        println!("{}", profile.description);
    }
    if found.is_empty() {
        none_found();
    }
    for chord in found {
        println!("{}", render::voicing_line(chord));
    }
    Ok(())
}

pub fn theory(session: &Session, choice: &KeyChoice, difficulty: Option<&str>, sort: Option<&str>) -> Result<()> {
    let tables = session.tables()?;
    choice.check(&tables)?;
    let catalog = session.catalog()?;
    let found = SelectionEngine::new(&catalog, &tables).chords_by_theory(&choice.key, &choice.mode);
    let found = session.narrow(found, difficulty, sort);

    heading(&format!("{} {}", choice.key, choice.mode));
    if found.is_empty() {
        none_found();
    }
    for item in &found {
        println!("{}", render::theory_line(item));
    }
    Ok(())
}

pub fn related(session: &Session, chord: &str, max: Option<usize>) -> Result<()> {
    let catalog = session.catalog()?;
    let max = max.unwrap_or(session.config.defaults.max_related);
    let engine = RelationshipEngine::new(&catalog).with_max_results(max);

    let Some(source) = catalog.find(chord) else {
        bail!("No chord {chord:?} in the catalog");
    };
    let related = engine.related(source);

    heading(&format!("Related to {}", source.name));
    if related.is_empty() {
        none_found();
    }
    for (i, item) in related.iter().enumerate() {
        println!("{}", render::related_line(i + 1, item));
    }
    Ok(())
}

pub fn progressions(
    session: &Session,
    kind: ProfileKind,
    id: &str,
    choice: &KeyChoice,
    with_voicings: bool,
) -> Result<()> {
    let tables = session.tables()?;
    let profiles = match kind {
        ProfileKind::Mood => &tables.moods,
        ProfileKind::Style => &tables.styles,
    };
    if profiles.get(id).is_none() {
        bail!("Unknown {} {id:?}", kind.label());
    }
    choice.check(&tables)?;

    // The engine only borrows the catalog for voicing lookups.
    let catalog = if with_voicings {
        session.catalog()?
    } else {
        ChordCatalog::default()
    };
    let engine = SelectionEngine::new(&catalog, &tables);
    let resolved = match kind {
        ProfileKind::Mood => engine.progressions_for_mood(id, &choice.key, &choice.mode),
        ProfileKind::Style => engine.progressions_for_style(id, &choice.key, &choice.mode),
    };

    heading(&format!("{} {id} in {} {}", kind.label(), choice.key, choice.mode));
    for progression in &resolved {
        println!("{}", render::progression_line(progression, choice.use_flats));
        if with_voicings {
            for step in &progression.steps {
                let ids: Vec<&str> = engine.voicings_for(step).into_iter().map(|c| c.id.as_str()).collect();
                let ids = if ids.is_empty() { "-".to_string() } else { ids.join(", ") };
                println!("    {:<7} {}", step.symbol(choice.use_flats), ids);
            }
        }
    }
    Ok(())
}

pub fn config(session: &Session, show_sources: bool) -> Result<()> {
    print!("{}", session.config.to_toml());
    if show_sources {
        println!();
        println!("# files:");
        for file in &session.sources.files {
            println!("#   {}", file.display());
        }
        println!("# environment:");
        for var in &session.sources.env_overrides {
            println!("#   {var}");
        }
    }
    Ok(())
}
