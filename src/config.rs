// Configuration loading and parsing (config/analyzer.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset: DatasetSection,
    pub league: LeagueSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSection {
    /// Path to the season summary CSV, relative to the working directory.
    pub path: String,
}

/// Default league shape used when the CLI does not override it.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueSection {
    pub num_teams: usize,
    pub roster_size: usize,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

fn parse_config(path: &Path, text: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load and validate configuration from `config/analyzer.toml` relative to
/// the given `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("analyzer.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    parse_config(&path, &text)
}

/// Convenience wrapper: loads config relative to the current working
/// directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.dataset.path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "dataset.path".into(),
            message: "must not be empty".into(),
        });
    }

    if config.league.num_teams == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.league.roster_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.roster_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
