//! Configuration for a single synthesis invocation.
//!
//! Values come from several layers. Priority, lowest to highest:
//! defaults < YAML file < environment variables (.env + actual ENV) < CLI flags.
//!
//! Each source is read into a [`ConfigLayer`] of optional values; layers are
//! merged and then validated into an [`AppConfig`] before any I/O happens.
//!
//! # Environment variables
//! - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`
//! - `POLLYC_VOICE`, `POLLYC_ENGINE`, `POLLYC_FORMAT`, `POLLYC_REGION`, `POLLYC_CACHE`
//!
//! # Example
//! ```rust,no_run
//! use polly_tts_cache::config::{AppConfig, ConfigLayer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cli = ConfigLayer {
//!     ofile: Some("hello.mp3".into()),
//!     text: Some("Hello".into()),
//!     ..Default::default()
//! };
//! let config = AppConfig::from_layer(ConfigLayer::from_env().merge(cli))?;
//! println!("Speaking with {}", config.voice);
//! # Ok(())
//! # }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zeroize::Zeroizing;

mod yaml;

pub use yaml::{CacheYaml, PollyYaml, YamlConfig};

use crate::core::cache::normalize_cache_dir;
use crate::core::text::{DEFAULT_ENGINE, DEFAULT_VOICE, SynthesisDirectives};
use crate::core::tts::{AwsPollyTTSConfig, DEFAULT_REGION, PollyOutputFormat, TextType};

/// Configuration errors. All of them are fatal and raised before any I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("mandatory option is missing: {0}")]
    MissingMandatory(&'static str),

    #[error("invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One source of optional configuration values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub ofile: Option<String>,
    pub text: Option<String>,
    pub key_id: Option<String>,
    pub access_key: Option<String>,
    pub voice: Option<String>,
    pub format: Option<String>,
    pub cache: Option<String>,
    pub region: Option<String>,
    pub engine: Option<String>,
}

impl ConfigLayer {
    /// Read the layer from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the layer through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            key_id: lookup("AWS_ACCESS_KEY_ID"),
            access_key: lookup("AWS_SECRET_ACCESS_KEY"),
            voice: lookup("POLLYC_VOICE"),
            format: lookup("POLLYC_FORMAT"),
            cache: lookup("POLLYC_CACHE"),
            region: lookup("POLLYC_REGION"),
            engine: lookup("POLLYC_ENGINE"),
            ..Default::default()
        }
    }

    /// Overlay `higher` on top of `self`; values set in `higher` win.
    pub fn merge(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            ofile: higher.ofile.or(self.ofile),
            text: higher.text.or(self.text),
            key_id: higher.key_id.or(self.key_id),
            access_key: higher.access_key.or(self.access_key),
            voice: higher.voice.or(self.voice),
            format: higher.format.or(self.format),
            cache: higher.cache.or(self.cache),
            region: higher.region.or(self.region),
            engine: higher.engine.or(self.engine),
        }
    }
}

/// Validated settings for one invocation.
#[derive(Clone)]
pub struct AppConfig {
    pub output_path: PathBuf,
    pub text: String,
    pub key_id: String,
    pub access_key: Zeroizing<String>,
    pub voice: String,
    pub format: PollyOutputFormat,
    /// `None` disables caching
    pub cache_dir: Option<PathBuf>,
    pub region: String,
    pub engine: String,
}

/// Empty strings count as unset, as an empty flag value does on the command line.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn mandatory(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::MissingMandatory(name))
}

impl AppConfig {
    /// Validate a merged layer, filling in defaults.
    pub fn from_layer(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let output_path = PathBuf::from(mandatory(layer.ofile, "ofile")?);
        let text = mandatory(layer.text, "text")?;
        let key_id = mandatory(layer.key_id, "keyid")?;
        let access_key = Zeroizing::new(mandatory(layer.access_key, "accesskey")?);

        let format = match non_empty(layer.format) {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                field: "format",
                value: raw.clone(),
                reason: format!("{e}"),
            })?,
            None => PollyOutputFormat::default(),
        };

        let cache_dir = layer.cache.as_deref().and_then(normalize_cache_dir);

        Ok(Self {
            output_path,
            text,
            key_id,
            access_key,
            voice: non_empty(layer.voice).unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            format,
            cache_dir,
            region: non_empty(layer.region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            engine: non_empty(layer.engine).unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
        })
    }

    /// Merge all sources and validate.
    ///
    /// `.env` is expected to be loaded into the process environment already.
    pub fn load(config_file: Option<&Path>, cli: ConfigLayer) -> Result<Self, ConfigError> {
        let base = match config_file {
            Some(path) => YamlConfig::from_file(path)?.into_layer(),
            None => ConfigLayer::default(),
        };
        Self::from_layer(base.merge(ConfigLayer::from_env()).merge(cli))
    }

    /// Directive state before any metatag is applied.
    pub fn initial_directives(&self) -> SynthesisDirectives {
        SynthesisDirectives {
            voice: self.voice.clone(),
            engine: self.engine.clone(),
            cache_enabled: true,
            text_type: TextType::Text,
        }
    }

    /// Connection settings for the Polly client.
    pub fn polly_config(&self) -> AwsPollyTTSConfig {
        AwsPollyTTSConfig::new(
            self.region.clone(),
            self.key_id.clone(),
            self.access_key.as_str(),
        )
    }

    /// True when a cache directory is configured.
    pub fn is_cache_configured(&self) -> bool {
        self.cache_dir.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("output_path", &self.output_path)
            .field("text", &self.text)
            .field("key_id", &self.key_id)
            .field("access_key", &"<redacted>")
            .field("voice", &self.voice)
            .field("format", &self.format)
            .field("cache_dir", &self.cache_dir)
            .field("region", &self.region)
            .field("engine", &self.engine)
            .finish()
    }
}
