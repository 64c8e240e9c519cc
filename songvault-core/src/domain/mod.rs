pub mod song;

pub use song::{
    ContentTypeMode, DEFAULT_AUDIO_CONTENT_TYPE, NewSong, Song, SongAudio,
    SongId, SongSummary,
};
