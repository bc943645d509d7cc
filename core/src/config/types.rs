use serde::{Deserialize, Serialize};

pub use crate::clone::UnsupportedPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Label attached to every log line the container emits.
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default)]
    pub clone: CloneConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_store_name() -> String {
    "store".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            clone: CloneConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloneConfig {
    /// `error` (default) or `null`.
    #[serde(default)]
    pub on_unsupported: UnsupportedPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// EnvFilter string, e.g. "info" or "fusestate=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            level: default_logging_level(),
        }
    }
}
