pub mod staging;

pub use staging::{AUDIO_FIELD, StagedFile};
