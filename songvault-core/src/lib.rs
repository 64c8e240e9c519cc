//! # Songvault Core
//!
//! Domain types, storage ports and the song service behind the Songvault
//! media store.
//!
//! - [`domain`]: song records and the content-type policy
//! - [`database`]: the [`database::SongRepository`] port with PostgreSQL and
//!   in-memory adapters
//! - [`application`]: [`application::SongService`], the upload/list/stream/delete
//!   operations
//! - [`error`]: the [`error::StoreError`] taxonomy shared by every layer

pub mod application;
pub mod database;
pub mod domain;

/// Error types and error handling utilities
pub mod error;

pub use application::{BufferedPart, SongService, UploadPart, UploadSummary};
pub use domain::{
    ContentTypeMode, DEFAULT_AUDIO_CONTENT_TYPE, NewSong, Song, SongAudio,
    SongId, SongSummary,
};
pub use error::{Result, StoreError};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
