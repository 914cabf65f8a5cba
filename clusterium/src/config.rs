use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clustering::ClusteringConfig;
use crate::detection::DetectorConfig;
use crate::error::{Error, Result};

/// Top-level settings for detection and clustering. Every field has a
/// default, so a config file only needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub clustering: ClusteringConfig,
}

impl Config {
    /// Reads and validates a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        config.validate();
        Ok(config)
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn validate(&self) {
        self.detector.validate();
        self.clustering.validate();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[detector]
polygon_epsilon = 5.0

[detector.area]
min = 1000.0

[clustering.kmeans]
seed = 9
attempts = 3
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.detector.polygon_epsilon, 5.0);
        assert_eq!(config.detector.area.min, 1000.0);
        assert_eq!(config.detector.area.max, 50000.0);
        assert_eq!(config.detector.blur_radius, 1);
        assert_eq!(config.clustering.kmeans.seed, 9);
        assert_eq!(config.clustering.kmeans.attempts, 3);
        assert_eq!(config.clustering.kmeans.max_iterations, 10);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::ConfigRead { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[detector\npolygon_epsilon = ").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_serialized_defaults_round_trip() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), Config::default());
    }
}
