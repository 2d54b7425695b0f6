use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
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

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

/// Provider Directory connection; the seed fetch is skipped when no endpoint
/// is configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySettings {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub max_entries: Option<u64>,
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Point ceilings for the scoring factors; defaults mirror the production
/// formula and are not normalized to 100
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_category_weight")]
    pub category: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
    #[serde(default = "default_response_weight")]
    pub response: f64,
    #[serde(default = "default_affinity_weight")]
    pub affinity: f64,
    #[serde(default = "default_avoid_penalty")]
    pub avoid_penalty: f64,
    #[serde(default = "default_experience_bonus")]
    pub experience_bonus: f64,
    #[serde(default = "default_success_bonus")]
    pub success_bonus: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            category: default_category_weight(),
            price: default_price_weight(),
            rating: default_rating_weight(),
            availability: default_availability_weight(),
            response: default_response_weight(),
            affinity: default_affinity_weight(),
            avoid_penalty: default_avoid_penalty(),
            experience_bonus: default_experience_bonus(),
            success_bonus: default_success_bonus(),
        }
    }
}

fn default_category_weight() -> f64 {
    30.0
}
fn default_price_weight() -> f64 {
    20.0
}
fn default_rating_weight() -> f64 {
    15.0
}
fn default_availability_weight() -> f64 {
    15.0
}
fn default_response_weight() -> f64 {
    10.0
}
fn default_affinity_weight() -> f64 {
    10.0
}
fn default_avoid_penalty() -> f64 {
    5.0
}
fn default_experience_bonus() -> f64 {
    5.0
}
fn default_success_bonus() -> f64 {
    5.0
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

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with CONSULTO_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CONSULTO_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CONSULTO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CONSULTO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_formula() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.category, 30.0);
        assert_eq!(weights.price, 20.0);
        assert_eq!(weights.rating, 15.0);
        assert_eq!(weights.availability, 15.0);
        assert_eq!(weights.response, 10.0);
        assert_eq!(weights.affinity, 10.0);
    }

    #[test]
    fn test_default_server_settings() {
        let server = ServerSettings::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
