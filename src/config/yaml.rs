use serde::Deserialize;
use std::path::Path;

use super::{ConfigError, ConfigLayer};

/// Complete YAML configuration structure
///
/// All fields are optional. Environment variables and command line flags
/// override anything specified here. The text and output file are per-call
/// values and cannot be set from YAML.
///
/// # Example YAML structure
/// ```yaml
/// polly:
///   region: "eu-west-1"
///   access_key_id: "AKIA..."
///   secret_access_key: "..."
///   voice: "Matthew"
///   engine: "neural"
///   format: "ogg_vorbis"
///
/// cache:
///   path: "/var/cache/pollyc"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub polly: Option<PollyYaml>,
    pub cache: Option<CacheYaml>,
}

/// Synthesis settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PollyYaml {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub voice: Option<String>,
    pub engine: Option<String>,
    pub format: Option<String>,
}

/// Cache settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CacheYaml {
    pub path: Option<String>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Flatten into a configuration layer.
    pub fn into_layer(self) -> ConfigLayer {
        let polly = self.polly.unwrap_or_default();
        let cache = self.cache.unwrap_or_default();
        ConfigLayer {
            key_id: polly.access_key_id,
            access_key: polly.secret_access_key,
            voice: polly.voice,
            format: polly.format,
            cache: cache.path,
            region: polly.region,
            engine: polly.engine,
            ..Default::default()
        }
    }
}
