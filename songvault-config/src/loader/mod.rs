pub mod db_url;
pub mod error;

use once_cell::sync::Lazy;
use songvault_core::ContentTypeMode;
use std::{fs, path::PathBuf};

use crate::{
    models::{
        AudioConfig, Config, ConfigMetadata, CorsConfig, DEFAULT_SERVER_PORT,
        DatabaseConfig, ServerConfig, UploadConfig,
        sources::{EnvConfig, FileConfig},
    },
    validation::{self, ConfigWarnings},
};
use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("songvault.toml"),
        PathBuf::from("config/songvault.toml"),
    ]
});

#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load `.env`, then the optional TOML file, then the process
    /// environment, and compose them into a [`Config`].
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded =
            dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?;

        self.load_with_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Compose from an already gathered environment. `load` delegates here;
    /// tests call it directly to avoid touching the process environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        compose_config(file_config, env, config_path, env_file_loaded)
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((None, None)),
            },
        };

        let contents =
            fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
                path: path.clone(),
                source,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| {
                ConfigLoadError::Parse {
                    path: path.clone(),
                    source,
                }
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

/// Merge file and environment values. Environment wins over the file; the
/// defaults fill whatever neither sets.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<ConfigLoad, ConfigLoadError> {
    let FileConfig {
        server: file_server,
        database: file_database,
        upload: file_upload,
        audio: file_audio,
        cors: file_cors,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| "0.0.0.0".to_string()),
        port: env
            .server_port
            .or(file_server.port)
            .unwrap_or(DEFAULT_SERVER_PORT),
    };

    let url = db_url::resolve_database_url(&env, &file_database)?
        .ok_or(ConfigLoadError::MissingDatabaseUrl)?;
    let max_connections = env
        .database_max_connections
        .or(file_database.max_connections)
        .unwrap_or_else(|| num_cpus::get() as u32);
    if max_connections == 0 {
        return Err(ConfigLoadError::InvalidValue {
            key: "DB_MAX_CONNECTIONS",
            message: "must be at least 1".into(),
        });
    }
    let database = DatabaseConfig {
        url,
        max_connections,
        min_connections: env
            .database_min_connections
            .or(file_database.min_connections)
            .unwrap_or(1),
        auto_migrate: env
            .database_auto_migrate
            .or(file_database.auto_migrate)
            .unwrap_or(true),
    };

    let upload = UploadConfig {
        staging_dir: env.upload_staging_dir.clone().or(file_upload.staging_dir),
    };
    upload.ensure_directories().map_err(|source| ConfigLoadError::Io {
        path: upload.staging_dir(),
        source,
    })?;

    let content_type_mode = match env
        .audio_content_type_mode
        .clone()
        .or(file_audio.content_type_mode)
    {
        Some(raw) => raw.parse::<ContentTypeMode>().map_err(|message| {
            ConfigLoadError::InvalidValue {
                key: "AUDIO_CONTENT_TYPE_MODE",
                message,
            }
        })?,
        None => ContentTypeMode::default(),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .clone()
            .or(file_cors.allowed_origins)
            .unwrap_or_default(),
    };

    let config = Config {
        server,
        database,
        upload,
        audio: AudioConfig { content_type_mode },
        cors,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    let warnings = validation::collect_warnings(&config);

    Ok(ConfigLoad { config, warnings })
}
