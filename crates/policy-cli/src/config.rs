use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "POLICYGEN_CONFIG";
pub const DRAFT_DIR_ENV: &str = "POLICYGEN_DRAFT_DIR";
pub const OUTPUT_DIR_ENV: &str = "POLICYGEN_OUTPUT_DIR";
pub const AUTOSAVE_ENV: &str = "POLICYGEN_AUTOSAVE_MS";
pub const PAID_ENV: &str = "POLICYGEN_PAID";

const DEFAULT_AUTOSAVE_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{key} must be {expected}, got '{value}'")]
    Env {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Optional keys of the TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    draft_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    autosave_interval_ms: Option<u64>,
    paid: Option<bool>,
}

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub draft_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub autosave_interval_ms: Option<u64>,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub draft_dir: PathBuf,
    pub output_dir: PathBuf,
    pub autosave_interval_ms: u64,
    pub paid: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let draft_dir = ProjectDirs::from("", "", "policygen")
            .map(|dirs| dirs.data_dir().join("drafts"))
            .unwrap_or_else(|| PathBuf::from(".policygen"));
        Self {
            draft_dir,
            output_dir: PathBuf::from("."),
            autosave_interval_ms: DEFAULT_AUTOSAVE_MS,
            paid: false,
        }
    }
}

impl AppConfig {
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::load_with(overrides, |key| env::var(key).ok())
    }

    /// Layers defaults, the config file, the environment and `overrides`.
    pub fn load_with(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file = overrides
            .config
            .clone()
            .or_else(|| lookup(CONFIG_ENV).map(PathBuf::from));
        if let Some(path) = file {
            config.apply_file(read_file(&path)?);
        }

        if let Some(dir) = lookup(DRAFT_DIR_ENV) {
            config.draft_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(AUTOSAVE_ENV) {
            config.autosave_interval_ms =
                raw.trim().parse::<u64>().map_err(|_| ConfigError::Env {
                    key: AUTOSAVE_ENV,
                    expected: "a number of milliseconds",
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = lookup(PAID_ENV) {
            config.paid = parse_flag(&raw).ok_or(ConfigError::Env {
                key: PAID_ENV,
                expected: "true or false",
                value: raw.clone(),
            })?;
        }

        if let Some(dir) = &overrides.draft_dir {
            config.draft_dir = dir.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(ms) = overrides.autosave_interval_ms {
            config.autosave_interval_ms = ms;
        }
        config.paid |= overrides.paid;

        debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(dir) = file.draft_dir {
            self.draft_dir = dir;
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = dir;
        }
        if let Some(ms) = file.autosave_interval_ms {
            self.autosave_interval_ms = ms;
        }
        if let Some(paid) = file.paid {
            self.paid = paid;
        }
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_any_layer() {
        let config = AppConfig::load_with(&Overrides::default(), env_of(&[])).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.autosave_interval(), Duration::from_secs(1));
        assert!(!config.paid);
    }

    #[test]
    fn layers_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policygen.toml");
        fs::write(
            &path,
            "draft_dir = \"/file/drafts\"\noutput_dir = \"/file/out\"\nautosave_interval_ms = 250\n",
        )
        .unwrap();

        let overrides = Overrides {
            config: Some(path),
            output_dir: Some(PathBuf::from("/flag/out")),
            ..Overrides::default()
        };
        let env = env_of(&[(OUTPUT_DIR_ENV, "/env/out"), (AUTOSAVE_ENV, "500")]);
        let config = AppConfig::load_with(&overrides, env).unwrap();

        assert_eq!(config.draft_dir, PathBuf::from("/file/drafts"));
        assert_eq!(config.output_dir, PathBuf::from("/flag/out"));
        assert_eq!(config.autosave_interval_ms, 500);
    }

    #[test]
    fn paid_flag_from_env_or_cli() {
        let config =
            AppConfig::load_with(&Overrides::default(), env_of(&[(PAID_ENV, "yes")])).unwrap();
        assert!(config.paid);

        let overrides = Overrides {
            paid: true,
            ..Overrides::default()
        };
        let config = AppConfig::load_with(&overrides, env_of(&[(PAID_ENV, "0")])).unwrap();
        assert!(config.paid);
    }

    #[test]
    fn bad_env_values_are_reported() {
        let err = AppConfig::load_with(&Overrides::default(), env_of(&[(AUTOSAVE_ENV, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(AUTOSAVE_ENV));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "colour = \"blue\"\n").unwrap();
        let overrides = Overrides {
            config: Some(path),
            ..Overrides::default()
        };
        assert!(matches!(
            AppConfig::load_with(&overrides, env_of(&[])),
            Err(ConfigError::Parse { .. })
        ));
    }
}
