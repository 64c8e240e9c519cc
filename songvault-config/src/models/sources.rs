use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub upload: FileUploadConfig,
    #[serde(default)]
    pub audio: FileAudioConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_migrate: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileUploadConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAudioConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type_mode: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_url_file: Option<PathBuf>,
    pub database_host: Option<String>,
    pub database_port: Option<u16>,
    pub database_user: Option<String>,
    pub database_name: Option<String>,
    pub database_password: Option<String>,
    pub database_password_file: Option<PathBuf>,
    pub database_max_connections: Option<u32>,
    pub database_min_connections: Option<u32>,
    pub database_auto_migrate: Option<bool>,
    pub upload_staging_dir: Option<PathBuf>,
    pub audio_content_type_mode: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `gather` uses the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_blank(&lookup, key);

        Self {
            config_path: var("SONGVAULT_CONFIG").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: parse_var(&lookup, "SERVER_PORT")
                .or_else(|| parse_var(&lookup, "PORT")),
            database_url: var("DATABASE_URL"),
            database_url_file: var("DATABASE_URL_FILE").map(PathBuf::from),
            database_host: var("DB_HOST"),
            database_port: parse_var(&lookup, "DB_PORT"),
            database_user: var("DB_USER"),
            database_name: var("DB_NAME"),
            database_password: var("DB_PASSWORD"),
            database_password_file: var("DB_PASSWORD_FILE").map(PathBuf::from),
            database_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS"),
            database_min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS"),
            database_auto_migrate: var("DATABASE_AUTO_MIGRATE")
                .and_then(|raw| parse_bool(&raw)),
            upload_staging_dir: var("UPLOAD_STAGING_DIR").map(PathBuf::from),
            audio_content_type_mode: var("AUDIO_CONTENT_TYPE_MODE"),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_csv(&raw)),
        }
    }
}

fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    non_blank(lookup, key).and_then(|raw| raw.trim().parse().ok())
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
