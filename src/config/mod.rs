//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `GRADER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CONTEXTUAL_WEIGHT, DEFAULT_SEMANTIC_WEIGHT};
use crate::embedding::{CrossEncoderConfig, SentenceEmbedderConfig};
use crate::scoring::{AggregationProfile, Weights};

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `GRADER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Root directory of the report store. Default: `./.data`.
    pub storage_path: PathBuf,

    /// Sentence-embedding model directory. Stub mode when unset.
    pub embedder_path: Option<PathBuf>,

    /// Cross-encoder model directory. Stub mode when unset.
    pub cross_encoder_path: Option<PathBuf>,

    /// Handwriting recognition endpoint. Image uploads are refused when unset.
    pub ocr_url: Option<String>,

    /// Weights of the weighted-mean profile. Default: `0.4 / 0.6`.
    pub weights: Weights,

    /// Threads scoring the pages of one comparison. Default: `1`.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            storage_path: PathBuf::from("./.data"),
            embedder_path: None,
            cross_encoder_path: None,
            ocr_url: None,
            weights: Weights::default(),
            workers: 1,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "GRADER_PORT";
    const ENV_BIND_ADDR: &'static str = "GRADER_BIND_ADDR";
    const ENV_STORAGE_PATH: &'static str = "GRADER_STORAGE_PATH";
    const ENV_EMBEDDER_PATH: &'static str = "GRADER_EMBEDDER_PATH";
    const ENV_CROSS_ENCODER_PATH: &'static str = "GRADER_CROSS_ENCODER_PATH";
    const ENV_OCR_URL: &'static str = "GRADER_OCR_URL";
    const ENV_SEMANTIC_WEIGHT: &'static str = "GRADER_SEMANTIC_WEIGHT";
    const ENV_CONTEXTUAL_WEIGHT: &'static str = "GRADER_CONTEXTUAL_WEIGHT";
    const ENV_WORKERS: &'static str = "GRADER_WORKERS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Weights are validated here, since an out-of-range pair is never usable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let embedder_path = Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH);
        let cross_encoder_path = Self::parse_optional_path_from_env(Self::ENV_CROSS_ENCODER_PATH);
        let ocr_url = Self::parse_optional_string_from_env(Self::ENV_OCR_URL);
        let semantic = Self::parse_f64_from_env(Self::ENV_SEMANTIC_WEIGHT, DEFAULT_SEMANTIC_WEIGHT)?;
        let contextual =
            Self::parse_f64_from_env(Self::ENV_CONTEXTUAL_WEIGHT, DEFAULT_CONTEXTUAL_WEIGHT)?;
        let workers = Self::parse_usize_from_env(Self::ENV_WORKERS, defaults.workers);

        let weights = Weights {
            semantic,
            contextual,
        };
        Self::validate_weights(&weights)?;

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            embedder_path,
            cross_encoder_path,
            ocr_url,
            weights,
            workers,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        for path in [&self.embedder_path, &self.cross_encoder_path]
            .into_iter()
            .flatten()
        {
            Self::validate_model_dir(path)?;
        }

        if let Some(ref url) = self.ocr_url {
            let valid = reqwest::Url::parse(url)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                return Err(ConfigError::InvalidOcrUrl { value: url.clone() });
            }
        }

        Self::validate_weights(&self.weights)?;

        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers {
                value: self.workers,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Sentence embedder settings derived from this config.
    pub fn embedder_config(&self) -> SentenceEmbedderConfig {
        match &self.embedder_path {
            Some(path) => SentenceEmbedderConfig::new(path),
            None => SentenceEmbedderConfig::stub(),
        }
    }

    /// Cross-encoder settings derived from this config.
    pub fn cross_encoder_config(&self) -> CrossEncoderConfig {
        match &self.cross_encoder_path {
            Some(path) => CrossEncoderConfig::new(path),
            None => CrossEncoderConfig::stub(),
        }
    }

    /// Weighted-mean profile with the configured weights.
    pub fn display_profile(&self) -> AggregationProfile {
        AggregationProfile::WeightedMean(self.weights)
    }

    fn validate_model_dir(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn validate_weights(weights: &Weights) -> Result<(), ConfigError> {
        weights
            .validate()
            .map_err(|e| ConfigError::InvalidWeights {
                reason: match e {
                    crate::scoring::ScoringError::InvalidWeights { reason } => reason,
                    other => other.to_string(),
                },
            })
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_f64_from_env(name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
