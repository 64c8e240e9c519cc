use std::{path::PathBuf, sync::Arc};

use axum_test::TestServer;
use songvault_config::{
    AudioConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ServerConfig, UploadConfig,
};
use songvault_core::{
    ContentTypeMode, SongService, database::InMemorySongRepository,
};
use songvault_server::{AppState, create_app};
use tempfile::TempDir;

// Used by several test binaries; not every one touches every field.
#[allow(unused)]
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemorySongRepository>,
    pub staging_dir: PathBuf,
    _tempdir: TempDir,
}

#[allow(unused)]
impl TestApp {
    /// Names of files still sitting in the staging directory.
    pub fn staged_files(&self) -> Vec<String> {
        std::fs::read_dir(&self.staging_dir)
            .expect("staging dir readable")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}

#[allow(unused)]
pub fn build_test_app() -> TestApp {
    build_test_app_with_mode(ContentTypeMode::Fixed)
}

pub fn build_test_app_with_mode(mode: ContentTypeMode) -> TestApp {
    let tempdir = tempfile::tempdir().expect("temporary directory");
    let staging_dir = tempdir.path().join("staging");
    std::fs::create_dir_all(&staging_dir).expect("staging directory");

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgresql://songvault@localhost:5432/songvault".into(),
            max_connections: 1,
            min_connections: 0,
            auto_migrate: false,
        },
        upload: UploadConfig {
            staging_dir: Some(staging_dir.clone()),
        },
        audio: AudioConfig {
            content_type_mode: mode,
        },
        cors: CorsConfig::default(),
        metadata: ConfigMetadata::default(),
    };

    let repo = Arc::new(InMemorySongRepository::new());
    let songs = Arc::new(SongService::new(repo.clone()));
    let state = AppState::new(songs, Arc::new(config));
    let server = TestServer::new(create_app(state)).expect("test server");

    TestApp {
        server,
        repo,
        staging_dir,
        _tempdir: tempdir,
    }
}
