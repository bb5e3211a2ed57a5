use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tickprof_protocol::PATH_SEPARATOR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tick rate must be positive")]
    ZeroTickRate,
}

/// Build flavour shown on the report's version line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Dev,
    #[default]
    Production,
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dev => write!(f, "dev"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Settings for rendering a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub build_mode: BuildMode,
    /// Expected ticks per second of the host clock.
    pub tick_rate: u32,
    /// Deepest timing level expanded before a subtree is cut off.
    pub max_depth: usize,
    /// Character joining location path segments in raw paths.
    pub separator: char,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            build_mode: BuildMode::Production,
            tick_rate: 20,
            max_depth: 128,
            separator: PATH_SEPARATOR,
        }
    }
}

impl ReportConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }
}
