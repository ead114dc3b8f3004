//! Runtime configuration
//!
//! Settings are resolved from, in order of precedence: explicit overrides
//! (command-line flags), environment variables, an optional `config.toml`
//! in the platform config directory, and built-in defaults.

use crate::metadata_retrieval::DEFAULT_TVMAZE_URL;
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the catalogue file location
pub const CATALOGUE_ENV: &str = "WHICH_EPISODE_CATALOGUE";

/// Environment variable overriding the TVMaze endpoint
pub const TVMAZE_URL_ENV: &str = "WHICH_EPISODE_TVMAZE_URL";

const CATALOGUE_FILE_NAME: &str = "episodes.csv";

/// Errors that can occur while reading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of `config.toml`, every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    catalogue: Option<PathBuf>,
    tvmaze_url: Option<String>,
}

/// Values given explicitly, typically from command-line flags
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub catalogue_path: Option<PathBuf>,
    pub tvmaze_base_url: Option<String>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the catalogue CSV file
    pub catalogue_path: PathBuf,
    /// Base URL of the TVMaze API
    pub tvmaze_base_url: String,
}

impl Config {
    /// Resolves the configuration for this process
    ///
    /// # Errors
    ///
    /// Fails only if a config file exists but cannot be read or parsed.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let project_dirs = directories::ProjectDirs::from("", "", "which-episode");

        let file = match &project_dirs {
            Some(dirs) => load_config_file(&dirs.config_dir().join("config.toml"))?,
            None => None,
        };

        // If the standard data dir could not be found (e.g. `$HOME` is not
        // set), default to the current directory.
        let data_dir = project_dirs
            .as_ref()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_default();

        Ok(Self::resolve_from(
            overrides,
            |key| env::var(key).ok().filter(|value| !value.is_empty()),
            file.unwrap_or_default(),
            &data_dir,
        ))
    }

    fn resolve_from<E>(
        overrides: ConfigOverrides,
        env_var: E,
        file: ConfigFile,
        data_dir: &Path,
    ) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let catalogue_path = overrides
            .catalogue_path
            .or_else(|| env_var(CATALOGUE_ENV).map(PathBuf::from))
            .or(file.catalogue)
            .unwrap_or_else(|| data_dir.join(CATALOGUE_FILE_NAME));

        let tvmaze_base_url = overrides
            .tvmaze_base_url
            .or_else(|| env_var(TVMAZE_URL_ENV))
            .or(file.tvmaze_url)
            .unwrap_or_else(|| DEFAULT_TVMAZE_URL.to_string());

        Self {
            catalogue_path,
            tvmaze_base_url,
        }
    }
}

fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    debug!("Reading config from {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve_from(
            ConfigOverrides::default(),
            no_env,
            ConfigFile::default(),
            Path::new("/data/which-episode"),
        );

        assert_eq!(
            config.catalogue_path,
            PathBuf::from("/data/which-episode/episodes.csv")
        );
        assert_eq!(config.tvmaze_base_url, "https://api.tvmaze.com");
    }

    #[test]
    fn test_precedence() {
        let file = ConfigFile {
            catalogue: Some(PathBuf::from("from-file.csv")),
            tvmaze_url: Some("http://file".to_string()),
        };
        let env_var = |key: &str| match key {
            CATALOGUE_ENV => Some("from-env.csv".to_string()),
            _ => None,
        };

        let config = Config::resolve_from(
            ConfigOverrides::default(),
            env_var,
            file,
            Path::new("/data"),
        );
        assert_eq!(config.catalogue_path, PathBuf::from("from-env.csv"));
        assert_eq!(config.tvmaze_base_url, "http://file");

        let overrides = ConfigOverrides {
            catalogue_path: Some(PathBuf::from("from-flag.csv")),
            tvmaze_base_url: None,
        };
        let config = Config::resolve_from(overrides, env_var, ConfigFile::default(), Path::new("/data"));
        assert_eq!(config.catalogue_path, PathBuf::from("from-flag.csv"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(load_config_file(&path).unwrap().is_none());

        fs::write(&path, "catalogue = \"/tmp/shows.csv\"\n").unwrap();
        let file = load_config_file(&path).unwrap().unwrap();
        assert_eq!(file.catalogue, Some(PathBuf::from("/tmp/shows.csv")));
        assert_eq!(file.tvmaze_url, None);

        fs::write(&path, "catalog = 3\n").unwrap();
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::ParseFailed { .. })
        ));
    }
}
