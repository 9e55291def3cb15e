use crate::search::SearchConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Search-as-you-type behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Dashboard configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("BUGTRAIL_CONFIG").ok();
        Self::load_from(config_path.as_deref())
    }

    /// Layer the embedded defaults, an optional file and `BUGTRAIL__*`
    /// environment variables, in that order
    pub fn load_from(config_path: Option<&str>) -> Result<Self, config::ConfigError> {
        layered(config_path, None)?.try_deserialize()
    }
}

/// Build the layered source. `env` replaces the process environment when given.
fn layered(
    config_path: Option<&str>,
    env: Option<config::Map<String, String>>,
) -> Result<config::Config, config::ConfigError> {
    let mut builder = config::Config::builder()
        // Start with default values
        .add_source(config::File::from_str(
            include_str!("../config/default.toml"),
            config::FileFormat::Toml,
        ));

    // Override with config file if given
    if let Some(path) = config_path {
        builder = builder.add_source(config::File::with_name(path).required(false));
    }

    // Override with environment variables. The `__` prefix separator keeps
    // BUGTRAIL_CONFIG, BUGTRAIL_DATA and BUGTRAIL_USER out of the tree.
    builder
        .add_source(
            config::Environment::with_prefix("BUGTRAIL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// Number of sessions listed as recent
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_recent_limit() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}
