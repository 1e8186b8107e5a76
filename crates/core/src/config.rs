use crate::error::ClarityResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CLARITY_TRIAL__` and an optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

/// Optional sections of the campaign form and list. Both console variants
/// (with and without blacklist / approval review) are served from one
/// schema by toggling these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default = "default_true")]
    pub blacklist: bool,
    #[serde(default = "default_true")]
    pub approval_workflow: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    /// Reject drafts whose end date precedes the start date. Off by default:
    /// inverted ranges are accepted and only logged.
    #[serde(default)]
    pub enforce_date_order: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    #[serde(default = "default_operator")]
    pub default_operator: String,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_true() -> bool {
    true
}
fn default_seed_demo_data() -> bool {
    true
}
fn default_operator() -> String {
    "admin".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self {
            blacklist: true,
            approval_workflow: true,
        }
    }
}

impl Features {
    /// Both optional sections off.
    pub fn minimal() -> Self {
        Self {
            blacklist: false,
            approval_workflow: false,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
            default_operator: default_operator(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            features: Features::default(),
            validation: ValidationConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then environment
    /// variables. Environment values win over the file.
    pub fn load_from(path: Option<&Path>) -> ClarityResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "Reading config file");
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("CLARITY_TRIAL")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
