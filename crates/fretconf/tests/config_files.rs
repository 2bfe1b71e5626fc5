//! Loading a config file that points at a catalog and a tables file.

use std::fs;
use std::path::PathBuf;

use fretconf::{ConfigError, FretConfig};
use fretwise::{ChordQuality, SelectionEngine};

fn fixture_catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fretwise/tests/fixtures/catalog.json")
}

#[test]
fn config_with_relative_data_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixture_catalog(), dir.path().join("chords.json")).unwrap();
    fs::write(
        dir.path().join("tables.toml"),
        r#"
[moods.sad]
preferred_qualities = ["minor"]

[styles.surf]
name = "Surf"
preferred_qualities = ["major6"]

[[styles.surf.progressions]]
name = "Stomp"
numerals = ["I", "IV", "V"]
"#,
    )
    .unwrap();
    let config_path = dir.path().join("fret.toml");
    fs::write(
        &config_path,
        r#"
[paths]
catalog = "chords.json"
tables = "tables.toml"

[defaults]
key = "G"
max_related = 4
"#,
    )
    .unwrap();

    let (config, sources) = FretConfig::load_with_sources_from(Some(&config_path)).unwrap();
    assert_eq!(sources.files.last(), Some(&config_path));
    assert_eq!(config.paths.catalog, Some(dir.path().join("chords.json")));
    assert_eq!(config.defaults.key, "G");

    let catalog = config.load_catalog().unwrap();
    assert_eq!(catalog.len(), 26);

    let tables = config.load_tables().unwrap();
    assert_eq!(
        tables.moods.get("sad").unwrap().preferred_qualities,
        vec![ChordQuality::Minor]
    );
    // built-in styles are still there
    assert!(tables.styles.get("jazz").is_some());

    let engine = SelectionEngine::new(&catalog, &tables);
    let surf = engine.progressions_for_style("surf", &config.defaults.key, "major");
    let symbols: Vec<String> = surf[0].steps.iter().map(|s| s.symbol(false)).collect();
    assert_eq!(symbols, vec!["G", "C", "D"]);
}

#[test]
fn broken_tables_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("fret.toml");
    fs::write(&config_path, "[paths]\ntables = \"missing.toml\"\n").unwrap();

    let config = FretConfig::load_from(Some(&config_path)).unwrap();
    match config.load_tables() {
        Err(ConfigError::FileRead { path, .. }) => {
            assert_eq!(path, dir.path().join("missing.toml"));
        }
        other => panic!("expected a read error, got {other:?}"),
    }
}
