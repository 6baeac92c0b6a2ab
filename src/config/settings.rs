//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default location of the optional settings file
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

/// Prefix for nested environment overrides, e.g. `LIPSYNC_GATEWAY__SERVER__PORT`
pub const ENV_PREFIX: &str = "LIPSYNC_GATEWAY";

/// Generation service API key
pub const API_KEY_ENV: &str = "API_KEY";
pub const CLOUDINARY_CLOUD_NAME_ENV: &str = "CLOUDINARY_CLOUD_NAME";
pub const CLOUDINARY_API_KEY_ENV: &str = "CLOUDINARY_API_KEY";
pub const CLOUDINARY_API_SECRET_ENV: &str = "CLOUDINARY_API_SECRET";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub sync: SyncConfig,
    pub cloudinary: CloudinaryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request body ceiling for the multipart upload routes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_mb() -> usize {
    100
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Cross-origin configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

/// Generation service (Sync Labs) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_sync_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sync_base_url() -> String {
    "https://api.sync.so/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Media host (Cloudinary) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_cloudinary_base_url")]
    pub base_url: String,
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_cloudinary_base_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

fn default_folder() -> String {
    "lipsync_uploads".to_string()
}

fn default_upload_timeout_secs() -> u64 {
    300
}

impl CloudinaryConfig {
    /// True when all three credentials are present and non-empty
    pub fn has_credentials(&self) -> bool {
        [&self.cloud_name, &self.api_key, &self.api_secret]
            .iter()
            .all(|v| v.as_deref().map_or(false, |s| !s.is_empty()))
    }
}

impl Settings {
    /// Load settings from the default file location and the process environment
    pub fn load() -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(DEFAULT_CONFIG_PATH, &env)
    }

    /// Load settings from a configuration file and an explicit environment map
    ///
    /// Precedence, lowest first: built-in defaults, the file (if it exists),
    /// `LIPSYNC_GATEWAY__*` overrides, then the flat `API_KEY` and
    /// `CLOUDINARY_*` variables.
    pub fn load_from<P: AsRef<Path>>(path: P, env: &HashMap<String, String>) -> Result<Self> {
        let path = path.as_ref();

        let format = if path.extension().map_or(false, |ext| ext == "yaml" || ext == "yml") {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("server.max_upload_mb", default_max_upload_mb() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("cors.allowed_origins", default_allowed_origins())?
            .set_default("sync.api_key", "")?
            .set_default("sync.base_url", default_sync_base_url())?
            .set_default("sync.timeout_secs", default_timeout_secs() as i64)?
            .set_default("cloudinary.base_url", default_cloudinary_base_url())?
            .set_default("cloudinary.folder", default_folder())?
            .set_default("cloudinary.timeout_secs", default_upload_timeout_secs() as i64)?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(format));
        }

        let env_source: config::Map<String, String> = env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .source(Some(env_source)),
            )
            .set_override_option("sync.api_key", lookup(env, API_KEY_ENV))?
            .set_override_option("cloudinary.cloud_name", lookup(env, CLOUDINARY_CLOUD_NAME_ENV))?
            .set_override_option("cloudinary.api_key", lookup(env, CLOUDINARY_API_KEY_ENV))?
            .set_override_option("cloudinary.api_secret", lookup(env, CLOUDINARY_API_SECRET_ENV))?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sync.api_key.trim().is_empty() {
            return Err(config_error(format!("{} environment variable not set.", API_KEY_ENV)));
        }

        if self.server.port == 0 {
            return Err(config_error("Server port cannot be 0"));
        }

        if self.server.max_upload_mb == 0 {
            return Err(config_error("server.max_upload_mb must be greater than 0"));
        }

        if self.sync.base_url.is_empty() {
            return Err(config_error("sync.base_url cannot be empty"));
        }

        if self.cloudinary.base_url.is_empty() {
            return Err(config_error("cloudinary.base_url cannot be empty"));
        }

        Ok(())
    }
}

fn lookup(env: &HashMap<String, String>, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.is_empty()).cloned()
}

fn config_error(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                max_upload_mb: default_max_upload_mb(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            cors: CorsConfig {
                allowed_origins: default_allowed_origins(),
            },
            sync: SyncConfig {
                api_key: String::new(),
                base_url: default_sync_base_url(),
                timeout_secs: default_timeout_secs(),
            },
            cloudinary: CloudinaryConfig {
                cloud_name: None,
                api_key: None,
                api_secret: None,
                base_url: default_cloudinary_base_url(),
                folder: default_folder(),
                timeout_secs: default_upload_timeout_secs(),
            },
        }
    }
}
