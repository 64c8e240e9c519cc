use std::{fmt, sync::Arc};

use songvault_config::Config;
use songvault_core::SongService;

#[derive(Clone)]
pub struct AppState {
    pub songs: Arc<SongService>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(songs: Arc<SongService>, config: Arc<Config>) -> Self {
        Self { songs, config }
    }

    pub fn songs(&self) -> &SongService {
        &self.songs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
