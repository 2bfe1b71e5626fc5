//! fret - guitar chord theory from the command line
//!
//! Subcommands:
//! - `fret scale [KEY]` - Notes of a key
//! - `fret chords [KEY]` - Diatonic triads and sevenths with roman numerals
//! - `fret mood <ID>` / `fret style <ID>` - Catalog voicings for a mood or style
//! - `fret theory [KEY]` - Catalog voicings that fit a key
//! - `fret related <CHORD>` - Chords related to a catalog chord, ranked
//! - `fret progressions --mood <ID> [KEY]` - A mood or style's progressions in a key
//! - `fret config` - Print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fretconf::FretConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{ProfileKind, Session};

#[derive(Parser)]
#[command(name = "fret")]
#[command(about = "Guitar chord theory: keys, moods, styles and related chords")]
#[command(version)]
struct Cli {
    /// Config file to use instead of ./fretwise.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chord catalog JSON, overriding the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct KeyArgs {
    /// Key root (C, F#, Bb); defaults to the configured key
    key: Option<String>,

    /// Mode (ionian, dorian, ..., major, minor)
    #[arg(short, long)]
    mode: Option<String>,

    /// Spell accidentals with flats
    #[arg(long)]
    flats: bool,
}

#[derive(Args)]
struct NarrowArgs {
    /// beginner, advanced or all
    #[arg(short, long)]
    difficulty: Option<String>,

    /// name, difficulty, root or quality
    #[arg(short, long)]
    sort: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the seven notes of a key
    Scale {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Print the diatonic chords of a key
    Chords {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// List catalog voicings for a mood
    Mood {
        /// Mood id (happy, sad, dreamy, ...)
        id: String,

        #[command(flatten)]
        narrow: NarrowArgs,
    },

    /// List catalog voicings for a style
    Style {
        /// Style id (pop, rock, jazz, ...)
        id: String,

        #[command(flatten)]
        narrow: NarrowArgs,
    },

    /// List catalog voicings that fill the diatonic slots of a key
    Theory {
        #[command(flatten)]
        key: KeyArgs,

        #[command(flatten)]
        narrow: NarrowArgs,
    },

    /// Rank catalog chords related to one chord
    Related {
        /// Chord id or name
        chord: String,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        max: Option<usize>,
    },

    /// Resolve a mood's or style's progressions in a key
    Progressions {
        /// Mood id
        #[arg(long, conflicts_with = "style", required_unless_present = "style")]
        mood: Option<String>,

        /// Style id
        #[arg(long)]
        style: Option<String>,

        #[command(flatten)]
        key: KeyArgs,

        /// List catalog voicings for every chord
        #[arg(long)]
        voicings: bool,
    },

    /// Print the effective configuration
    Config {
        /// Also list the files and environment variables that contributed
        #[arg(long)]
        sources: bool,
    },
}

/// Subscriber used while the config itself loads, driven by `RUST_LOG` alone.
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish()
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, sources) = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        FretConfig::load_with_sources_from(cli.config.as_deref())
    })
    .context("Failed to load configuration")?;
    if let Some(catalog) = cli.catalog {
        config.paths.catalog = Some(catalog);
    }

    init_tracing(&config.logging.level);
    tracing::debug!(files = ?sources.files, "configuration loaded");

    let session = Session { config, sources };

    match cli.command {
        Commands::Scale { key } => {
            let choice = session.key_choice(key.key, key.mode, key.flats);
            commands::scale(&session, &choice)?;
        }
        Commands::Chords { key } => {
            let choice = session.key_choice(key.key, key.mode, key.flats);
            commands::chords(&session, &choice)?;
        }
        Commands::Mood { id, narrow } => {
            commands::profile(
                &session,
                ProfileKind::Mood,
                &id,
                narrow.difficulty.as_deref(),
                narrow.sort.as_deref(),
            )?;
        }
        Commands::Style { id, narrow } => {
            commands::profile(
                &session,
                ProfileKind::Style,
                &id,
                narrow.difficulty.as_deref(),
                narrow.sort.as_deref(),
            )?;
        }
        Commands::Theory { key, narrow } => {
            let choice = session.key_choice(key.key, key.mode, key.flats);
            commands::theory(
                &session,
                &choice,
                narrow.difficulty.as_deref(),
                narrow.sort.as_deref(),
            )?;
        }
        Commands::Related { chord, max } => {
            commands::related(&session, &chord, max)?;
        }
        Commands::Progressions {
            mood,
            style,
            key,
            voicings,
        } => {
            let (kind, id) = match (mood, style) {
                (Some(mood), _) => (ProfileKind::Mood, mood),
                (None, Some(style)) => (ProfileKind::Style, style),
                (None, None) => anyhow::bail!("Pass --mood or --style"),
            };
            let choice = session.key_choice(key.key, key.mode, key.flats);
            commands::progressions(&session, kind, &id, &choice, voicings)?;
        }
        Commands::Config { sources } => {
            commands::config(&session, sources)?;
        }
    }

    Ok(())
}
