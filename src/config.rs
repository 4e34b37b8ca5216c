//! Parse configuration (SPEC_FULL.md §11): a small `tinymoe.toml`, loaded the
//! way the teacher loads `Largo.toml`/`credentials.toml` — `toml` for the
//! file, `dirs` for the user-level fallback, CLI flags layered on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Physical tab width used only for column reporting in diagnostics
    /// (spec.md §6: "implementation-defined"). Indentation *comparison*
    /// always uses raw byte columns regardless of this value.
    pub tab_width: usize,
    /// Cap on `ResultList` branching (teacher: `MAX_FOREST_READINGS`).
    pub max_ambiguous_readings: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig { tab_width: 4, max_ambiguous_readings: 12 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::path::PathBuf, String),
    Parse(std::path::PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "failed to read {}: {}", path.display(), e),
            ConfigError::Parse(path, e) => write!(f, "failed to parse {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Loads `path` if given, else `./tinymoe.toml`, else the user-level
    /// fallback resolved via `dirs::config_dir()`. A missing file at any of
    /// these locations is not an error — defaults apply (SPEC_FULL.md §11).
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = path {
            return Self::read(path);
        }
        let project_local = Path::new("tinymoe.toml");
        if project_local.exists() {
            return Self::read(project_local);
        }
        if let Some(user_path) = user_config_path() {
            if user_path.exists() {
                return Self::read(&user_path);
            }
        }
        Ok(Config::default())
    }

    fn read(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))
    }

    /// Applies CLI overrides on top of file-loaded values (SPEC_FULL.md §11:
    /// "CLI flags ... overriding file values").
    pub fn merge_cli(mut self, max_ambiguous_readings: Option<usize>) -> Config {
        if let Some(max) = max_ambiguous_readings {
            self.parse.max_ambiguous_readings = max;
        }
        self
    }
}

fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|p| p.join("tinymoe").join("tinymoe.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.parse.tab_width, 4);
        assert_eq!(config.parse.max_ambiguous_readings, 12);
    }

    #[test]
    fn load_with_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.toml");
        let config = Config::load(Some(&missing));
        assert!(matches!(config, Err(ConfigError::Io(..))));
    }

    #[test]
    fn load_parses_a_project_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tinymoe.toml");
        fs::write(&path, "[parse]\ntab_width = 8\nmax_ambiguous_readings = 20\n").unwrap();
        let config = Config::load(Some(&path)).expect("valid toml should load");
        assert_eq!(config.parse.tab_width, 8);
        assert_eq!(config.parse.max_ambiguous_readings, 20);
    }

    #[test]
    fn merge_cli_overrides_file_value() {
        let config = Config::default().merge_cli(Some(99));
        assert_eq!(config.parse.max_ambiguous_readings, 99);
    }

    #[test]
    fn merge_cli_without_override_keeps_file_value() {
        let config = Config::default().merge_cli(None);
        assert_eq!(config.parse.max_ambiguous_readings, 12);
    }
}
