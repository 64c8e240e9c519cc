pub mod sources;

use songvault_core::ContentTypeMode;
use std::path::PathBuf;

/// Listening port when neither the environment nor the file sets one.
pub const DEFAULT_SERVER_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    pub audio: AudioConfig,
    pub cors: CorsConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub auto_migrate: bool,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &redact_url(&self.url))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("auto_migrate", &self.auto_migrate)
            .finish()
    }
}

impl DatabaseConfig {
    /// The connection URL with any password masked, safe for logs.
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("****"));
            parsed.to_string()
        }
        Ok(parsed) => parsed.to_string(),
        Err(_) => "<unparseable>".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Where multipart files are staged; the system temp dir when unset.
    pub staging_dir: Option<PathBuf>,
}

impl UploadConfig {
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        if let Some(dir) = &self.staging_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AudioConfig {
    pub content_type_mode: ContentTypeMode,
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_permissive(&self) -> bool {
        self.allowed_origins.is_empty()
            || self
                .allowed_origins
                .iter()
                .any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_debug_output_masks_password() {
        let db = DatabaseConfig {
            url: "postgresql://songs:hunter2@db:5432/songs".into(),
            max_connections: 4,
            min_connections: 1,
            auto_migrate: true,
        };

        let rendered = format!("{db:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(db.redacted_url().contains("****"));
    }

    #[test]
    fn cors_wildcard_or_empty_is_permissive() {
        assert!(CorsConfig::default().is_permissive());
        assert!(
            CorsConfig {
                allowed_origins: vec!["*".into()]
            }
            .is_permissive()
        );
        assert!(
            !CorsConfig {
                allowed_origins: vec!["http://localhost:5173".into()]
            }
            .is_permissive()
        );
    }
}
