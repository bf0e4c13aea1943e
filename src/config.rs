//! Configuration file support for ferro-txmap.
//!
//! This module loads `.ferro-txmap.toml` files, which tune allele matching
//! and batch processing.
//!
//! # Example Configuration
//!
//! ```toml
//! [allele-matching]
//! direction = "5prime"
//! window = 100
//!
//! [batch]
//! continue-on-error = true
//! chunk-size = 1000
//! threads = 0
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-txmap.toml` in current directory
//! 2. `~/.config/ferro/txmap.toml`
//!
//! Settings that are absent keep their library defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::batch::BatchConfig;
use crate::equivalence::MatcherConfig;
use crate::error::TxMapError;
use crate::normalize::ShuffleDirection;
#[cfg(feature = "parallel")]
use crate::parallel::ParallelConfig;

/// Parsed configuration from a .ferro-txmap.toml file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxMapConfig {
    /// Allele matching section.
    pub allele_matching: AlleleMatchingConfig,
    /// Batch processing section.
    pub batch: BatchSection,
}

/// `[allele-matching]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleMatchingConfig {
    /// Direction indels are shifted before comparison.
    pub direction: Option<ShuffleDirection>,
    /// Initial flanking window, in bases.
    pub window: Option<u64>,
}

/// `[batch]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSection {
    /// Keep going after a record fails.
    pub continue_on_error: Option<bool>,
    /// Records per parallel work unit.
    pub chunk_size: Option<usize>,
    /// Worker threads; 0 uses the rayon default.
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    AlleleMatching,
    Batch,
    Other,
}

impl TxMapConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro-txmap.toml` in current directory
    /// 2. `~/.config/ferro/txmap.toml`
    pub fn load() -> Option<Self> {
        let cwd_config = PathBuf::from(".ferro-txmap.toml");
        if cwd_config.exists() {
            match Self::load_from_path(&cwd_config) {
                Ok(config) => return Some(config),
                Err(e) => log::warn!("ignoring {}: {}", cwd_config.display(), e),
            }
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("txmap.toml");
            if home_config.exists() {
                match Self::load_from_path(&home_config) {
                    Ok(config) => return Some(config),
                    Err(e) => log::warn!("ignoring {}: {}", home_config.display(), e),
                }
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    ///
    /// Understands the subset of TOML used by the config file: section
    /// headers, `key = value` lines and `#` comments. Unknown sections and
    /// keys are skipped; malformed values are errors.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = TxMapConfig::default();
        let mut section = Section::Other;

        for (line_no, raw) in content.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = match line[1..line.len() - 1].trim() {
                    "allele-matching" => Section::AlleleMatching,
                    "batch" => Section::Batch,
                    other => {
                        log::debug!("skipping unknown config section [{}]", other);
                        Section::Other
                    }
                };
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!(
                    "line {}: expected `key = value`, got `{}`",
                    line_no + 1,
                    line
                )));
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            let at = |e: String| ConfigError::Parse(format!("line {}: {}", line_no + 1, e));

            match (section, key) {
                (Section::AlleleMatching, "direction") => {
                    config.allele_matching.direction = Some(
                        ShuffleDirection::from_str(value).map_err(|e| at(e.to_string()))?,
                    );
                }
                (Section::AlleleMatching, "window") => {
                    config.allele_matching.window = Some(parse_value(key, value).map_err(at)?);
                }
                (Section::Batch, "continue-on-error") => {
                    config.batch.continue_on_error = Some(parse_value(key, value).map_err(at)?);
                }
                (Section::Batch, "chunk-size") => {
                    config.batch.chunk_size = Some(parse_value(key, value).map_err(at)?);
                }
                (Section::Batch, "threads") => {
                    config.batch.threads = Some(parse_value(key, value).map_err(at)?);
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Allele matcher settings, defaults filled in.
    pub fn to_matcher_config(&self) -> MatcherConfig {
        let defaults = MatcherConfig::default();
        MatcherConfig {
            direction: self.allele_matching.direction.unwrap_or(defaults.direction),
            window: self.allele_matching.window.unwrap_or(defaults.window),
        }
    }

    /// Sequential batch settings, defaults filled in.
    pub fn to_batch_config(&self) -> BatchConfig {
        let config = BatchConfig::default();
        match self.batch.continue_on_error {
            Some(flag) => config.continue_on_error(flag),
            None => config,
        }
    }

    /// Parallel batch settings, defaults filled in.
    #[cfg(feature = "parallel")]
    pub fn to_parallel_config(&self) -> ParallelConfig {
        let defaults = ParallelConfig::default();
        ParallelConfig {
            chunk_size: self.batch.chunk_size.unwrap_or(defaults.chunk_size),
            num_threads: self.batch.threads.unwrap_or(defaults.num_threads),
        }
    }
}

/// Configuration loading error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Config IO error: {0}")]
    Io(String),
    /// Parse error in config file.
    #[error("Config parse error: {0}")]
    Parse(String),
}

impl From<ConfigError> for TxMapError {
    fn from(err: ConfigError) -> Self {
        TxMapError::Config {
            msg: err.to_string(),
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid value `{}` for `{}`", value, key))
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
