pub mod song_service;
pub mod upload;

pub use song_service::{SongService, UploadSummary};
pub use upload::{BufferedPart, UploadPart};
