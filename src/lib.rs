//! NBA shot-chart collection pipeline
//!
//! Scrapes season rosters from basketball-reference.com, resolves team and
//! player identifiers against the djblechn-su lookup tables, pulls per-player
//! shot charts from stats.nba.com and writes per-season CSV artifacts.

pub mod data;
pub mod pipeline;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique stats.nba.com identifier for a franchise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// Unique stats.nba.com identifier for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

/// An NBA season, identified by its end year (2021 is the 2020-21 season)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Season(pub u16);

impl Season {
    /// Season string in the form stats.nba.com expects, e.g. "2020-21"
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.0 - 1, self.0 % 100)
    }

    /// Directory name for this season's artifacts, e.g. "2020_21"
    pub fn dir_name(&self) -> String {
        format!("{}_{:02}", self.0 - 1, self.0 % 100)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote source of collected data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    IdTables,
    BasketballReference,
    StatsApi,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::IdTables => write!(f, "ID tables"),
            DataSource::BasketballReference => write!(f, "basketball-reference"),
            DataSource::StatsApi => write!(f, "stats.nba.com"),
        }
    }
}

impl std::error::Error for DataSource {}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{source} request failed: {message}")]
    Source { source: DataSource, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CollectError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub seasons: SeasonConfig,
    pub output: OutputConfig,
    pub http: HttpConfig,
}

/// Inclusive range of season end years to collect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub first: u16,
    pub last: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seasons: SeasonConfig {
                first: 2015,
                last: 2021,
            },
            output: OutputConfig {
                dir: "dataset".to_string(),
            },
            http: HttpConfig { timeout_secs: 30 },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CollectError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CollectError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Season end years to collect, in order
    pub fn season_range(&self) -> impl Iterator<Item = Season> {
        (self.seasons.first..=self.seasons.last).map(Season)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_label() {
        assert_eq!(Season(2021).label(), "2020-21");
        assert_eq!(Season(2015).label(), "2014-15");
        assert_eq!(Season(2010).label(), "2009-10");
    }

    #[test]
    fn test_season_dir_name() {
        assert_eq!(Season(2021).dir_name(), "2020_21");
        assert_eq!(Season(2008).dir_name(), "2007_08");
    }

    #[test]
    fn test_default_season_range() {
        let config = Config::default();
        let seasons: Vec<_> = config.season_range().collect();
        assert_eq!(seasons.first(), Some(&Season(2015)));
        assert_eq!(seasons.last(), Some(&Season(2021)));
        assert_eq!(seasons.len(), 7);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.seasons.first, config.seasons.first);
        assert_eq!(parsed.output.dir, config.output.dir);
    }
}
