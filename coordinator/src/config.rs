// config.rs - Run configuration loaded from TOML
//
// Every section falls back to its defaults, so an empty file (or no file
// at all) gives a 64x64 toroidal board on the task engine with a single
// launcher-discovered group.

use std::fs;
use std::path::{Path, PathBuf};

use conway::board::check_dimensions;
use conway::{Boundary, EngineKind, Seeding};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BOARD_WIDTH: usize = 64;
pub const DEFAULT_BOARD_HEIGHT: usize = 64;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CONWAY_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub seeding: Seeding,
    pub engine: EngineConfig,
    pub group: GroupConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
    pub boundary: Boundary,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            boundary: Boundary::Wrap,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Members of an in-process group; 1 leaves membership to the launcher.
    pub local_members: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self { local_members: 1 }
    }
}

impl Config {
    /// Load from `path`, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.board.width, self.board.height)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if !(0.0..=1.0).contains(&self.seeding.probability) {
            return Err(ConfigError::Invalid(format!(
                "seeding probability {} is outside [0, 1]",
                self.seeding.probability
            )));
        }
        if self.group.local_members == 0 {
            return Err(ConfigError::Invalid("group needs at least one member".into()));
        }
        Ok(())
    }
}
