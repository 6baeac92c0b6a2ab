//! Configuration module

pub mod settings;

pub use settings::{
    CloudinaryConfig, CorsConfig, LoggingConfig, ServerConfig, Settings, SyncConfig,
};
