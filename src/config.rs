use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::models::ReferencePosition;
use crate::services::PharmacySource;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub cache: CacheSettings,
    pub map: MapSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Pharmacy data set location; `url` wins over `path` when both are set
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    pub url: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            url: None,
        }
    }
}

fn default_data_path() -> PathBuf { PathBuf::from("data/pharmacies.json") }

impl DataSettings {
    pub fn source(&self) -> PharmacySource {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => PharmacySource::Http(url.to_string()),
            _ => PharmacySource::File(self.path.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: default_ttl_secs() }
    }
}

fn default_ttl_secs() -> u64 { 300 }

/// Map framing defaults; the center is Rouen
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_center_lat")]
    pub default_lat: f64,
    #[serde(default = "default_center_lng")]
    pub default_lng: f64,
    /// Fraction of the result span added on each side of the returned bounds
    #[serde(default = "default_bounds_padding")]
    pub bounds_padding: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_lat: default_center_lat(),
            default_lng: default_center_lng(),
            bounds_padding: default_bounds_padding(),
        }
    }
}

fn default_center_lat() -> f64 { 49.4431 }
fn default_center_lng() -> f64 { 1.0993 }
fn default_bounds_padding() -> f64 { 0.1 }

impl MapSettings {
    pub fn default_center(&self) -> ReferencePosition {
        ReferencePosition::new(self.default_lat, self.default_lng)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PHARMA__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PHARMA__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("PHARMA")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
