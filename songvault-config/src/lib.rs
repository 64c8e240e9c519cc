//! Configuration library for Songvault.
//!
//! Values are layered `.env` → optional `songvault.toml` → process
//! environment; the server applies CLI overrides on top.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, compose_config, error::ConfigLoadError,
};
pub use models::{
    AudioConfig, Config, ConfigMetadata, CorsConfig, DEFAULT_SERVER_PORT,
    DatabaseConfig, ServerConfig, UploadConfig,
    sources::{EnvConfig, FileConfig},
};
pub use validation::{ConfigWarning, ConfigWarnings};
