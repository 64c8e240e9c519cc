use std::fs;

use songvault_config::{
    ConfigLoadError, ConfigLoader, EnvConfig, FileConfig, compose_config,
};
use songvault_core::ContentTypeMode;

fn env_with_url() -> EnvConfig {
    EnvConfig {
        database_url: Some("postgresql://songs@localhost:5432/songs".into()),
        ..EnvConfig::default()
    }
}

#[test]
fn defaults_apply_when_only_database_is_configured() {
    let load = compose_config(None, env_with_url(), None, false)
        .expect("config composes");
    let config = load.config;

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.database.min_connections, 1);
    assert!(config.database.max_connections >= 1);
    assert!(config.database.auto_migrate);
    assert_eq!(config.audio.content_type_mode, ContentTypeMode::Fixed);
    assert!(config.cors.allowed_origins.is_empty());
    assert!(config.metadata.config_path.is_none());

    let messages: Vec<_> =
        load.warnings.items.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("CORS"));
}

#[test]
fn missing_database_is_fatal() {
    let err = compose_config(None, EnvConfig::default(), None, false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingDatabaseUrl));
}

#[test]
fn unknown_content_type_mode_is_rejected() {
    let env = EnvConfig {
        audio_content_type_mode: Some("sniffed".into()),
        ..env_with_url()
    };
    let err = compose_config(None, env, None, false).unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::InvalidValue {
            key: "AUDIO_CONTENT_TYPE_MODE",
            ..
        }
    ));
}

#[test]
fn zero_max_connections_is_rejected() {
    let env = EnvConfig {
        database_max_connections: Some(0),
        ..env_with_url()
    };
    let err = compose_config(None, env, None, false).unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::InvalidValue {
            key: "DB_MAX_CONNECTIONS",
            ..
        }
    ));
}

#[test]
fn environment_overrides_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let staging = dir.path().join("staging");
    let path = dir.path().join("songvault.toml");
    fs::write(
        &path,
        format!(
            r#"
[server]
host = "127.0.0.1"
port = 4000

[database]
url = "postgresql://file@db:5432/songs"
max_connections = 3
auto_migrate = false

[upload]
staging_dir = "{}"

[audio]
content_type_mode = "stored"

[cors]
allowed_origins = ["http://localhost:5173"]
"#,
            staging.display()
        ),
    )
    .unwrap();

    let env = EnvConfig {
        server_port: Some(5000),
        ..env_with_url()
    };
    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env, false)
        .expect("config loads");
    let config = load.config;

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5000);
    assert_eq!(
        config.database.url,
        "postgresql://songs@localhost:5432/songs"
    );
    assert_eq!(config.database.max_connections, 3);
    assert!(!config.database.auto_migrate);
    assert_eq!(config.audio.content_type_mode, ContentTypeMode::Stored);
    assert_eq!(config.upload.staging_dir(), staging);
    assert!(staging.is_dir(), "staging dir is created on load");
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert!(load.warnings.is_empty());
}

#[test]
fn explicit_config_path_must_exist() {
    let err = ConfigLoader::new()
        .with_config_path("/no/such/songvault.toml")
        .load_with_env(env_with_url(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn malformed_toml_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songvault.toml");
    fs::write(&path, "[server\nport = ").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env_with_url(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn file_database_url_picks_up_password_from_environment() {
    let file: FileConfig = toml::from_str(
        r#"
[database]
url = "postgresql://songs@db:5432/library"
"#,
    )
    .unwrap();
    let env = EnvConfig {
        database_password: Some("hunter2".into()),
        ..EnvConfig::default()
    };

    let load = compose_config(Some(file), env, None, false).unwrap();
    assert_eq!(
        load.config.database.url,
        "postgresql://songs:hunter2@db:5432/library"
    );
    assert!(!format!("{:?}", load.config.database).contains("hunter2"));
}
