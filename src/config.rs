use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub cache: CacheConfig,
    pub explorer: ExplorerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Maximum number of subtrees scanned concurrently.
    ///
    /// This bounds simultaneously open directory handles, not correctness;
    /// totals come out the same at any setting.
    pub fan_out: usize,
    /// Number of entries kept on the largest-files shortlist
    pub large_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum age of a cached scan in seconds, regardless of mtime
    pub freshness_ceiling_secs: u64,
    /// Tolerance for directory mtime advancing past the scan time, in seconds.
    /// Absorbs filesystem timestamp granularity and clock skew.
    pub grace_window_secs: u64,
    /// Override for the cache directory (default: per-user cache dir)
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Default number of entries shown per directory listing
    pub top: usize,
    /// Show sizes in decimal (MB) instead of binary (MiB) units
    pub decimal_sizes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            cache: CacheConfig::default(),
            explorer: ExplorerConfig::default(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            fan_out: 8,
            large_files: 20,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_ceiling_secs: 7 * 24 * 60 * 60,
            grace_window_secs: 2,
            directory: None,
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            top: 30,
            decimal_sizes: false,
        }
    }
}

impl CacheConfig {
    pub fn freshness_ceiling(&self) -> Duration {
        Duration::from_secs(self.freshness_ceiling_secs)
    }

    pub fn grace_window(&self) -> Duration {
        Duration::from_secs(self.grace_window_secs)
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path, failure to read or parse is an error. Without
    /// one, the default location is tried and a missing file falls back to
    /// defaults silently.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default_path = Self::default_path();
                match default_path {
                    Some(p) if p.exists() => Self::from_file(&p),
                    _ => Ok(Self::default()),
                }
            }
        }
    }

    /// Default config file location: `<config dir>/spelunk/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("spelunk").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scanner.fan_out == 0 {
            return Err(ConfigError::Invalid(
                "scanner.fan_out must be at least 1".into(),
            ));
        }
        if self.scanner.large_files == 0 {
            return Err(ConfigError::Invalid(
                "scanner.large_files must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scanner.fan_out, 8);
        assert_eq!(config.cache.grace_window_secs, 2);
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[cache]"));
    }

    #[test]
    fn default_ceiling_is_a_week() {
        let config = CacheConfig::default();
        assert_eq!(config.freshness_ceiling(), Duration::from_secs(604_800));
    }

    #[test]
    fn load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scanner]\nfan_out = 4\nlarge_files = 5").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.scanner.fan_out, 4);
        assert_eq!(config.scanner.large_files, 5);
        // Unspecified sections keep defaults
        assert_eq!(config.explorer.top, 30);
    }

    #[test]
    fn load_rejects_zero_fan_out() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scanner]\nfan_out = 0").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn load_missing_explicit_file_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }
}
