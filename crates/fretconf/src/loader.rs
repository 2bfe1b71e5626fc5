//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, FretConfig};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// An explicit path replaces `./fretwise.toml` and is returned even if it
/// does not exist, so loading reports it instead of silently skipping it.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/fretwise/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("fretwise/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("fretwise.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML config file and layer it over `config`.
pub fn load_from_file(config: &mut FretConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let table = parse_toml(&contents, path)?;
    apply_table(config, &table, path)
}

fn parse_toml(contents: &str, path: &Path) -> Result<toml::Table, ConfigError> {
    contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Overlay the keys present in `table` onto `config`; absent keys keep
/// their current value. Relative paths resolve against the directory of
/// `origin`.
pub fn apply_table(config: &mut FretConfig, table: &toml::Table, origin: &Path) -> Result<(), ConfigError> {
    let invalid = |key: &str, expected: &str| ConfigError::Parse {
        path: origin.to_path_buf(),
        message: format!("{key} must be {expected}"),
    };

    if let Some(paths) = table.get("paths").and_then(|v| v.as_table()) {
        if let Some(v) = paths.get("catalog") {
            let v = v.as_str().ok_or_else(|| invalid("paths.catalog", "a string"))?;
            config.paths.catalog = Some(resolve_path(v, origin));
        }
        if let Some(v) = paths.get("tables") {
            let v = v.as_str().ok_or_else(|| invalid("paths.tables", "a string"))?;
            config.paths.tables = Some(resolve_path(v, origin));
        }
    }

    if let Some(defaults) = table.get("defaults").and_then(|v| v.as_table()) {
        let text = |key: &str| -> Result<Option<String>, ConfigError> {
            match defaults.get(key) {
                None => Ok(None),
                Some(v) => v
                    .as_str()
                    .map(|s| Some(s.to_string()))
                    .ok_or_else(|| invalid(&format!("defaults.{key}"), "a string")),
            }
        };
        if let Some(v) = text("key")? {
            config.defaults.key = v;
        }
        if let Some(v) = text("mode")? {
            config.defaults.mode = v;
        }
        if let Some(v) = text("difficulty")? {
            config.defaults.difficulty = v;
        }
        if let Some(v) = text("sort_by")? {
            config.defaults.sort_by = v;
        }
        if let Some(v) = defaults.get("max_related") {
            config.defaults.max_related = v
                .as_integer()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid("defaults.max_related", "a non-negative integer"))?;
        }
    }

    if let Some(logging) = table.get("logging").and_then(|v| v.as_table()) {
        if let Some(v) = logging.get("level") {
            let v = v.as_str().ok_or_else(|| invalid("logging.level", "a string"))?;
            config.logging.level = v.to_string();
        }
    }

    debug!(path = %origin.display(), "applied config file");
    Ok(())
}

fn resolve_path(value: &str, origin: &Path) -> PathBuf {
    let path = expand_path(value);
    match origin.parent() {
        Some(dir) if path.is_relative() && !dir.as_os_str().is_empty() => dir.join(path),
        _ => path,
    }
}

/// Apply `FRETWISE_*` and `RUST_LOG` overrides from the process environment.
pub fn apply_env_overrides(config: &mut FretConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, |key| env::var(key).ok());
}

/// Apply overrides from any variable lookup.
pub fn apply_overrides_from<F>(config: &mut FretConfig, sources: &mut ConfigSources, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let take = |key: &str, sources: &mut ConfigSources| {
        let value = lookup(key)?;
        sources.env_overrides.push(key.to_string());
        Some(value)
    };

    if let Some(v) = take("FRETWISE_CATALOG", sources) {
        config.paths.catalog = Some(expand_path(&v));
    }
    if let Some(v) = take("FRETWISE_TABLES", sources) {
        config.paths.tables = Some(expand_path(&v));
    }
    if let Some(v) = take("FRETWISE_DEFAULT_KEY", sources) {
        config.defaults.key = v;
    }
    if let Some(v) = take("FRETWISE_DEFAULT_MODE", sources) {
        config.defaults.mode = v;
    }
    if let Some(v) = lookup("FRETWISE_MAX_RELATED") {
        if let Ok(n) = v.trim().parse() {
            config.defaults.max_related = n;
            sources.env_overrides.push("FRETWISE_MAX_RELATED".to_string());
        }
    }
    if let Some(v) = take("FRETWISE_LOG_LEVEL", sources) {
        config.logging.level = v;
    }
    // RUST_LOG wins over the fretwise-specific level
    if let Some(v) = take("RUST_LOG", sources) {
        config.logging.level = v;
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        match directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            Some(home) => home.join(stripped),
            None => PathBuf::from(path),
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // $VAR/rest/of/path
        let (var_name, rest) = match stripped.find('/') {
            Some(slash) => (&stripped[..slash], Some(&stripped[slash + 1..])),
            None => (stripped, None),
        };
        match env::var(var_name) {
            Ok(value) => {
                let base = PathBuf::from(value);
                match rest {
                    Some(rest) => base.join(rest),
                    None => base,
                }
            }
            Err(_) => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    }
}
